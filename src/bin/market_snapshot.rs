use market_snapshot::config::Config;
use market_snapshot::models::quote::SymbolEntry;
use market_snapshot::providers::yahoo::YahooProvider;
use market_snapshot::registry;
use market_snapshot::services::collector::{self, SnapshotCollector};
use market_snapshot::services::writer;

use anyhow::Context;
use chrono::Utc;
use clap::{Arg, Command};
use log::info;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger, progress lines are logged at info level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let output_arg = Arg::new("output")
        .short('o')
        .long("output")
        .value_name("PATH")
        .help("Snapshot file path")
        .takes_value(true)
        .default_value("data.json");

    let app = Command::new("MarketSnapshot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fetch a market quote snapshot and write it as JSON")
        .subcommand(
            Command::new("fetch")
                .about("Fetch all registered symbols and write the snapshot")
                .arg(output_arg.clone())
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_name("SECS")
                        .help("Per-request timeout in seconds")
                        .takes_value(true)
                        .default_value("30"),
                )
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .value_name("URL")
                        .help("Market data provider base URL")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("only")
                        .long("only")
                        .value_name("KEYS")
                        .help("Comma separated symbol keys to fetch (default: all)")
                        .takes_value(true),
                ),
        )
        .subcommand(Command::new("symbols").about("List registered symbols"))
        .subcommand(
            Command::new("show")
                .about("Summarize an existing snapshot file")
                .arg(output_arg),
        );

    let matches = app.get_matches();

    if let Some(matches) = matches.subcommand_matches("fetch") {
        let output = matches.value_of("output").unwrap_or("data.json");
        let timeout_secs = matches.value_of("timeout")
            .unwrap_or("30")
            .parse::<u64>()
            .context("Invalid --timeout value")?;

        let mut config = Config::new()
            .with_output_path(output)
            .with_timeout_secs(timeout_secs);
        if let Some(url) = matches.value_of("base-url") {
            config = config.with_base_url(url);
        }

        let entries: Vec<SymbolEntry> = match matches.value_of("only") {
            Some(keys) => {
                let keys: Vec<&str> = keys.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .collect();
                registry::select(&keys)?
            }
            None => registry::entries().to_vec(),
        };

        // 客户端创建失败时仍写出快照，所有品种记为错误
        let snapshot = match YahooProvider::new(&config.base_url, config.timeout_secs) {
            Ok(provider) => {
                let collector = SnapshotCollector::new(&config, Arc::new(provider));
                collector.collect_all(&entries).await
            }
            Err(e) => collector::unavailable_snapshot(&entries, &e, Utc::now()),
        };

        writer::write_snapshot(&snapshot, Path::new(&config.output_path))
            .with_context(|| format!("Failed to write snapshot to {}", config.output_path))?;

        info!("Wrote {} - {} symbols, {} errors",
              config.output_path, snapshot.data.len(), snapshot.errors.len());
    } else if matches.subcommand_matches("symbols").is_some() {
        for entry in registry::entries() {
            info!("{:<12} {}", entry.key, entry.provider_symbol);
        }
        info!("{} symbols registered", registry::entries().len());
    } else if let Some(matches) = matches.subcommand_matches("show") {
        let output = matches.value_of("output").unwrap_or("data.json");
        let snapshot = writer::read_snapshot(Path::new(output))
            .with_context(|| format!("Failed to read snapshot from {}", output))?;

        info!("Snapshot updated at {}", snapshot.updated);
        info!("{:-<44}", "");
        info!("{:<12} {:>14} {:>10} {:>5}", "Key", "Price", "Chg%", "Src");
        info!("{:-<44}", "");
        for (key, quote) in snapshot.data.iter() {
            info!("{:<12} {:>14.2} {:>+10.2} {:>5}", key, quote.price, quote.change_pct, quote.source);
        }
        for note in &snapshot.errors {
            info!("error: {}", note);
        }
        info!("{} symbols, {} errors", snapshot.data.len(), snapshot.errors.len());
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}
