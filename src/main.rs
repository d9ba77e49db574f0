//! db-run - a command-line SQL batch runner.

use db_run::cli::Cli;
use db_run::db::SqlxConnector;
use db_run::error::Result;
use db_run::exec::Runner;
use db_run::extract;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = cli.to_run_config();

    let statements = extract::extract(&cli.inputs, cli.file);
    info!(
        "Following SQL(s) will be executed:\n{}\n",
        statements.join("\n")
    );

    // Ctrl-C stops the run during the next inter-statement pause.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let connector = SqlxConnector;
    let runner = Runner::new(&connector, cancel);
    if let Err(e) = runner.run(&statements, &config).await {
        error!("Execute SQL(s) error. SQL(s):\n{}", statements.join("\n"));
        return Err(e);
    }

    Ok(())
}
