use anyhow::{Context, Result};
use covidscraper::{
    fetch::{self, Dataset, DATASETS, OUTPUT_DIR},
    process,
    table::Table,
};
use reqwest::Client;
use std::fs;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) configure output dir ─────────────────────────────────────
    fs::create_dir_all(OUTPUT_DIR)
        .with_context(|| format!("creating output directory {}", OUTPUT_DIR))?;

    // ─── 3) fetch all three datasets jointly ─────────────────────────
    info!("fetching latest data from Johns Hopkins");
    let client = Client::new();
    let (confirmed, deaths, recovered) = tokio::try_join!(
        fetch::fetch_csv(&client, DATASETS[0].url),
        fetch::fetch_csv(&client, DATASETS[1].url),
        fetch::fetch_csv(&client, DATASETS[2].url),
    )?;

    // ─── 4) clean + write each dataset independently ─────────────────
    for (dataset, body) in DATASETS.iter().zip([confirmed, deaths, recovered]) {
        if let Err(e) = run_dataset(dataset, &body) {
            error!(dataset = dataset.name, "failed: {:#}", e);
        }
    }

    info!("all done");
    Ok(())
}

fn run_dataset(dataset: &Dataset, body: &str) -> Result<()> {
    let table = Table::parse_csv(body)
        .with_context(|| format!("parsing {} dataset", dataset.name))?;
    let cleaned = process::clean(table);
    info!(dataset = dataset.name, rows = cleaned.len(), "processed");

    let text = cleaned
        .to_csv_string()
        .with_context(|| format!("serializing {} dataset", dataset.name))?;
    fs::write(dataset.output, text).with_context(|| format!("writing {}", dataset.output))?;
    info!("saved {}", dataset.output);
    Ok(())
}
