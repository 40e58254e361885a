// src/process/mod.rs

pub mod fold;
pub mod rules;
pub mod states;

use tracing::info;

use crate::table::Table;
use fold::CountyBuckets;
use rules::Disposition;

/// Run the full cleaning pass over one dataset.
///
/// Pass one walks every row through the rename chain, dropping the rows
/// the rules remove and diverting US county rows into per-state buckets.
/// Pass two folds the completed buckets into the surviving state rows.
/// Two passes are required: a state's county total is unknown until every
/// county row has been scanned. Surviving rows keep their relative order
/// and their full column set.
#[tracing::instrument(level = "info", skip(table), fields(rows_in = table.len()))]
pub fn clean(table: Table) -> Table {
    let (columns, rows) = table.into_rows();

    let mut buckets = CountyBuckets::new();
    let mut kept = Vec::with_capacity(rows.len());
    for mut row in rows {
        if rules::normalize(&mut row) == Disposition::Drop {
            continue;
        }
        if let Some(state_code) = fold::county_state_code(&row) {
            buckets.absorb(state_code, row);
            continue;
        }
        kept.push(row);
    }

    for row in &mut kept {
        fold::fold_state_row(row, &buckets);
    }

    info!(rows_out = kept.len(), "cleaned dataset");
    Table::new(columns, kept)
}
