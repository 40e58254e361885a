// src/process/fold.rs

use std::collections::HashMap;
use tracing::warn;

use crate::process::states::STATE_CODES;
use crate::table::{Row, COUNTRY_REGION, FIXED_COLUMNS, PROVINCE_STATE};

/// County rows collected during the first pass, keyed by state postal
/// code. Built fresh for each dataset and consumed by [`fold_state_row`]
/// once the first pass is complete; totals are unknowable before then.
#[derive(Debug, Default)]
pub struct CountyBuckets {
    by_state: HashMap<String, Vec<Row>>,
}

impl CountyBuckets {
    pub fn new() -> Self {
        CountyBuckets::default()
    }

    /// Take ownership of a county row under its state code.
    pub fn absorb(&mut self, state_code: String, row: Row) {
        self.by_state.entry(state_code).or_default().push(row);
    }

    pub fn contains(&self, state_code: &str) -> bool {
        self.by_state.contains_key(state_code)
    }

    /// Sum one column across every county row bucketed for a state.
    /// Malformed or empty cells contribute 0; the source data is too
    /// scrappy for a bad cell to abort the run.
    fn sum_column(&self, state_code: &str, column: &str) -> i64 {
        let Some(rows) = self.by_state.get(state_code) else {
            return 0;
        };
        rows.iter()
            .map(|row| {
                let cell = row.get(column).trim();
                cell.parse::<i64>().unwrap_or_else(|_| {
                    if !cell.is_empty() {
                        warn!(state_code, column, cell, "non-numeric county cell, counting 0");
                    }
                    0
                })
            })
            .sum()
    }
}

/// Detect a US county row and return its state postal code.
///
/// Counties are published as "<county>, <state>" in `Province/State`,
/// usually with a postal code ("Snohomish County, WA") but occasionally a
/// full name; a two-part comma split under country "US" is the signal.
/// Upstream writes the capital district as "D.C.".
pub fn county_state_code(row: &Row) -> Option<String> {
    if row.get(COUNTRY_REGION) != "US" {
        return None;
    }
    let province = row.get(PROVINCE_STATE);
    let mut parts = province.split(',');
    let (_, state, rest) = (parts.next()?, parts.next()?, parts.next());
    if rest.is_some() {
        return None;
    }
    let state = state.trim();
    let code = match state {
        "D.C." => "DC",
        _ => STATE_CODES.get(state).copied().unwrap_or(state),
    };
    Some(code.to_string())
}

/// Second pass: fill a state-level row's zero columns from its county
/// bucket. Applies only to US rows whose `Province/State` is a full
/// state/territory name; everything else passes through untouched.
pub fn fold_state_row(row: &mut Row, buckets: &CountyBuckets) {
    if row.get(COUNTRY_REGION) != "US" {
        return;
    }
    let Some(&state_code) = STATE_CODES.get(row.get(PROVINCE_STATE)) else {
        return;
    };
    if !buckets.contains(state_code) {
        return;
    }

    let columns = row.columns().clone();
    for (index, column) in columns.names().iter().enumerate() {
        if FIXED_COLUMNS.contains(&column.as_str()) {
            continue;
        }
        // Only a reported zero is presumed to mean "counted at county
        // level instead"; a nonzero state figure wins.
        if row.value_at(index) == "0" {
            let total = buckets.sum_column(state_code, column);
            row.set_at(index, total.to_string());
        }
    }
}
