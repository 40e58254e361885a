// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;

/// One of the three Johns Hopkins CSSE time series: where to fetch it and
/// where the cleaned copy lands.
#[derive(Debug)]
pub struct Dataset {
    pub name: &'static str,
    pub url: &'static str,
    pub output: &'static str,
}

pub const OUTPUT_DIR: &str = "csse_covid_19_data";

/// The three upstream time series. Plain HTTP GET, no auth.
pub static DATASETS: &[Dataset] = &[
    Dataset {
        name: "Confirmed",
        url: "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_19-covid-Confirmed.csv",
        output: "csse_covid_19_data/time_series_19-covid-Confirmed.csv",
    },
    Dataset {
        name: "Deaths",
        url: "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_19-covid-Deaths.csv",
        output: "csse_covid_19_data/time_series_19-covid-Deaths.csv",
    },
    Dataset {
        name: "Recovered",
        url: "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_19-covid-Recovered.csv",
        output: "csse_covid_19_data/time_series_19-covid-Recovered.csv",
    },
];

/// Fetch one CSV document as text.
pub async fn fetch_csv(client: &Client, url: &str) -> Result<String> {
    client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()
        .with_context(|| format!("bad status from {}", url))?
        .text()
        .await
        .with_context(|| format!("reading body from {}", url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn three_datasets_with_distinct_outputs() {
        assert_eq!(DATASETS.len(), 3);
        let outputs: HashSet<&str> = DATASETS.iter().map(|d| d.output).collect();
        assert_eq!(outputs.len(), 3);
        for dataset in DATASETS {
            assert!(dataset.url.starts_with("https://"));
            assert!(dataset.output.starts_with(OUTPUT_DIR));
            assert!(dataset.output.contains(dataset.name));
        }
    }
}
