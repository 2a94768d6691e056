//! minibudget main entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use minibudget_api::start_server;
use minibudget_config::Config;
use minibudget_core::{ImportFormat, Ledger};
use minibudget_utils::format_money;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "minibudget")]
#[command(version)]
#[command(about = "A small income and expense tracker backed by a JSON file", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Import transactions from a CSV or JSON file
    Import {
        file: PathBuf,
        /// csv or json; taken from the file extension when omitted
        #[arg(long)]
        format: Option<ImportFormat>,
    },
    /// Write all transactions as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print income, expense and balance
    Summary,
    /// Remove every transaction
    Clear,
    /// Print the default configuration file
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if matches!(args.command, Some(Command::InitConfig)) {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load_or_default(&args.config).and_then(Config::apply_env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            anyhow::bail!("Failed to load configuration from {}", args.config.display());
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();
    log::info!(
        "Config loaded: data file={}, page size={}",
        config.data_file().display(),
        config.pagination.records_per_page
    );

    let rt = Runtime::new()?;
    rt.block_on(run(config, args.command.unwrap_or(Command::Serve)))
}

async fn run(config: Config, command: Command) -> anyhow::Result<()> {
    let mut ledger = Ledger::from_config(config.clone());

    match command {
        Command::Serve | Command::InitConfig => {
            log::info!("Using data file: {}", ledger.location());
            start_server(config, Arc::new(RwLock::new(ledger))).await?;
        }
        Command::Import { file, format } => {
            let report = ledger
                .import_file(file.clone(), format)
                .await
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!("Imported {} transaction(s)", report.created);
            if !report.is_complete() {
                anyhow::bail!(
                    "Import stopped at row {}: {}",
                    report.failed_row.unwrap_or_default(),
                    report.error.unwrap_or_default()
                );
            }
        }
        Command::Export { output } => {
            let csv = ledger.export_csv().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, csv)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    log::info!("Exported to {}", path.display());
                }
                None => print!("{}", csv),
            }
        }
        Command::Summary => {
            let summary = ledger.summary().await?;
            let money = |amount: f64| {
                format_money(amount, config.currency.decimal_places as usize, &config.currency.symbol)
            };
            println!("Income:  {}", money(summary.income));
            println!("Expense: {}", money(summary.expense));
            println!("Balance: {}", money(summary.balance));
        }
        Command::Clear => {
            ledger.clear().await?;
            println!("All transactions removed");
        }
    }

    Ok(())
}
