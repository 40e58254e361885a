// src/table/mod.rs

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{collections::HashMap, sync::Arc};

pub const PROVINCE_STATE: &str = "Province/State";
pub const COUNTRY_REGION: &str = "Country/Region";
pub const LAT: &str = "Lat";
pub const LONG: &str = "Long";

/// Columns that identify a region rather than carry a count.
pub const FIXED_COLUMNS: &[&str] = &[PROVINCE_STATE, COUNTRY_REGION, LAT, LONG];

/// Column names shared by every row of one table, with a name → position
/// lookup. Shared via `Arc` so rows stay cheap to move between passes.
#[derive(Debug)]
pub struct Columns {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Columns {
    pub fn new(names: Vec<String>) -> Arc<Self> {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Arc::new(Columns { names, index })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One record of a table: field values addressable by column name.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<Columns>,
    values: Vec<String>,
}

impl Row {
    pub fn new(columns: Arc<Columns>, values: Vec<String>) -> Self {
        Row { columns, values }
    }

    pub fn columns(&self) -> &Arc<Columns> {
        &self.columns
    }

    /// Value of the named column, or "" when the upstream file lacks it.
    pub fn get(&self, column: &str) -> &str {
        self.columns
            .position(column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn value_at(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    /// Overwrite the named column. Unknown columns are ignored, matching
    /// the lenient handling of the source files elsewhere in the pipeline.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        if let Some(slot) = self
            .columns
            .position(column)
            .and_then(|i| self.values.get_mut(i))
        {
            *slot = value.into();
        }
    }

    pub fn set_at(&mut self, index: usize, value: impl Into<String>) {
        if index < self.values.len() {
            self.values[index] = value.into();
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// An in-memory CSV document: one header, many rows.
#[derive(Debug)]
pub struct Table {
    columns: Arc<Columns>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Arc<Columns>, rows: Vec<Row>) -> Self {
        Table { columns, rows }
    }

    /// Parse a CSV document. Ragged rows are rejected; the upstream time
    /// series files are rectangular and a short row would silently
    /// misalign date columns.
    pub fn parse_csv(text: &str) -> Result<Table> {
        let mut reader = ReaderBuilder::new().from_reader(text.as_bytes());
        let headers = reader
            .headers()
            .context("reading CSV header row")?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let columns = Columns::new(headers);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("reading CSV record")?;
            let values = record.iter().map(str::to_string).collect::<Vec<_>>();
            rows.push(Row::new(Arc::clone(&columns), values));
        }

        Ok(Table::new(columns, rows))
    }

    pub fn columns(&self) -> &Arc<Columns> {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> (Arc<Columns>, Vec<Row>) {
        (self.columns, self.rows)
    }

    /// Serialize back to CSV text: header first, rows in order.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.names())
            .context("writing CSV header row")?;
        for row in &self.rows {
            writer
                .write_record(row.values())
                .context("writing CSV record")?;
        }
        let bytes = writer.into_inner().context("flushing CSV writer")?;
        String::from_utf8(bytes).context("CSV output was not valid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Province/State,Country/Region,Lat,Long,3/1/20,3/2/20
Hubei,Mainland China,30.9756,112.2707,66907,67103
,Italy,43.0,12.0,1694,2036
";

    #[test]
    fn parse_gives_named_access() -> Result<()> {
        let table = Table::parse_csv(SAMPLE)?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns().len(), 6);
        assert_eq!(table.rows()[0].get(PROVINCE_STATE), "Hubei");
        assert_eq!(table.rows()[1].get(COUNTRY_REGION), "Italy");
        assert_eq!(table.rows()[1].get("3/2/20"), "2036");
        assert_eq!(table.rows()[0].get("no such column"), "");
        Ok(())
    }

    #[test]
    fn set_only_touches_known_columns() -> Result<()> {
        let table = Table::parse_csv(SAMPLE)?;
        let mut row = table.rows()[0].clone();
        row.set(COUNTRY_REGION, "China");
        row.set("no such column", "ignored");
        assert_eq!(row.get(COUNTRY_REGION), "China");
        assert_eq!(row.values().len(), 6);
        Ok(())
    }

    #[test]
    fn csv_round_trips_losslessly() -> Result<()> {
        let table = Table::parse_csv(SAMPLE)?;
        let text = table.to_csv_string()?;
        let reparsed = Table::parse_csv(&text)?;
        assert_eq!(reparsed.columns().names(), table.columns().names());
        assert_eq!(reparsed.len(), table.len());
        for (a, b) in table.rows().iter().zip(reparsed.rows()) {
            assert_eq!(a.values(), b.values());
        }
        Ok(())
    }

    #[test]
    fn set_tolerates_short_rows() {
        let columns = Columns::new(vec![
            PROVINCE_STATE.to_string(),
            COUNTRY_REGION.to_string(),
            "3/1/20".to_string(),
        ]);
        // Hand-built row with fewer values than columns.
        let mut row = Row::new(columns, vec!["Hubei".to_string()]);
        row.set("3/1/20", "7");
        assert_eq!(row.get("3/1/20"), "");
        assert_eq!(row.values().len(), 1);
    }

    #[test]
    fn written_file_reads_back_identically() -> Result<()> {
        let table = Table::parse_csv(SAMPLE)?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("time_series_19-covid-Confirmed.csv");

        std::fs::write(&path, table.to_csv_string()?)?;
        let reparsed = Table::parse_csv(&std::fs::read_to_string(&path)?)?;

        assert_eq!(reparsed.columns().names(), table.columns().names());
        assert_eq!(reparsed.len(), table.len());
        for (a, b) in table.rows().iter().zip(reparsed.rows()) {
            assert_eq!(a.values(), b.values());
        }
        Ok(())
    }

    #[test]
    fn quoted_cells_survive_round_trip() -> Result<()> {
        let source = "\
Province/State,Country/Region,Lat,Long,3/1/20
\"King County, WA\",US,47.6,-122.3,10
";
        let table = Table::parse_csv(source)?;
        assert_eq!(table.rows()[0].get(PROVINCE_STATE), "King County, WA");
        let reparsed = Table::parse_csv(&table.to_csv_string()?)?;
        assert_eq!(reparsed.rows()[0].get(PROVINCE_STATE), "King County, WA");
        Ok(())
    }
}
