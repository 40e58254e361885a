// src/process/rules.rs
//
// The upstream files label the same place inconsistently from day to day
// ("Taiwan" vs "Taipei and environs", "Iran" vs "Iran (Islamic Republic
// of)"). Each rule below collapses one family of labels onto a single
// spelling, or drops rows we never emit (cruise ships, duplicate country
// entries). Rule order matters: later rules see the already-rewritten
// fields.

use crate::table::{Row, COUNTRY_REGION, PROVINCE_STATE};

/// Which fields a rule's needles are matched against.
#[derive(Debug, Clone, Copy)]
enum Scope {
    /// `Province/State` or `Country/Region`.
    Either,
    /// `Country/Region` only.
    Country,
    /// `Province/State` only.
    Province,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    /// Rewrite the labels: `province` of `Some("")` clears the province,
    /// `None` leaves it alone.
    Relabel {
        province: Option<&'static str>,
        country: &'static str,
    },
    /// Remove the row from the output entirely.
    Remove,
}

struct Rule {
    needles: &'static [&'static str],
    scope: Scope,
    action: Action,
}

/// The rename chain, applied in order. Matching is case-insensitive
/// substring containment.
static RULES: &[Rule] = &[
    Rule {
        needles: &["taiwan", "taipei"],
        scope: Scope::Either,
        action: Action::Relabel {
            province: Some(""),
            country: "Taiwan",
        },
    },
    Rule {
        needles: &["hong kong"],
        scope: Scope::Either,
        action: Action::Relabel {
            province: Some(""),
            country: "Hong Kong",
        },
    },
    Rule {
        needles: &["macau"],
        scope: Scope::Either,
        action: Action::Relabel {
            province: Some(""),
            country: "Macau",
        },
    },
    Rule {
        needles: &["iran"],
        scope: Scope::Country,
        action: Action::Relabel {
            province: None,
            country: "Iran",
        },
    },
    Rule {
        needles: &["holy see"],
        scope: Scope::Country,
        action: Action::Relabel {
            province: None,
            country: "Vatican City",
        },
    },
    // "Viet Nam" rows duplicate the "Vietnam" entries upstream.
    Rule {
        needles: &["viet nam"],
        scope: Scope::Country,
        action: Action::Remove,
    },
    Rule {
        needles: &["republic of korea"],
        scope: Scope::Country,
        action: Action::Relabel {
            province: None,
            country: "South Korea",
        },
    },
    Rule {
        needles: &["palestinian"],
        scope: Scope::Country,
        action: Action::Relabel {
            province: None,
            country: "Palestine",
        },
    },
    Rule {
        needles: &["congo"],
        scope: Scope::Country,
        action: Action::Relabel {
            province: None,
            country: "Congo",
        },
    },
    // Diamond Princess / Grand Princess cruise ships.
    Rule {
        needles: &["princess"],
        scope: Scope::Province,
        action: Action::Remove,
    },
];

/// What the normalizer decided about a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    Drop,
}

fn field_matches(row: &Row, column: &str, needles: &[&str]) -> bool {
    let value = row.get(column).to_lowercase();
    needles.iter().any(|needle| value.contains(needle))
}

fn rule_matches(rule: &Rule, row: &Row) -> bool {
    match rule.scope {
        Scope::Either => {
            field_matches(row, PROVINCE_STATE, rule.needles)
                || field_matches(row, COUNTRY_REGION, rule.needles)
        }
        Scope::Country => field_matches(row, COUNTRY_REGION, rule.needles),
        Scope::Province => field_matches(row, PROVINCE_STATE, rule.needles),
    }
}

/// Run the rename chain over one row in place. `Disposition::Drop` means
/// the row must not appear in the output. Only the two label columns are
/// ever touched.
pub fn normalize(row: &mut Row) -> Disposition {
    for rule in RULES {
        if !rule_matches(rule, row) {
            continue;
        }
        match rule.action {
            Action::Relabel { province, country } => {
                if let Some(province) = province {
                    row.set(PROVINCE_STATE, province);
                }
                row.set(COUNTRY_REGION, country);
            }
            Action::Remove => return Disposition::Drop,
        }
    }
    Disposition::Keep
}
