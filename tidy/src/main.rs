//! tidy - household chore ledger command line

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tidy::{commands, config::Args, db::MongoClient, MongoLedgerStore};
use tidy_ledger::ChoreLedger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| args.default_log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);
    if args.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    if let Some(output) = commands::run_offline(&args.command)? {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let config = args.load_ledger_config()?;
    info!(
        "Mode: {}, chore reward: {}",
        if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" },
        config.chore_reward
    );

    let client = MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await?;
    let store = Arc::new(MongoLedgerStore::new(&client).await?);
    let ledger = ChoreLedger::new(store).with_config(config);

    let session = commands::open_session(&ledger, &args).await?;
    let output = commands::execute(&ledger, &session, args.command.clone()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
