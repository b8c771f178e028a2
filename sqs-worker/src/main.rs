use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use sqs_worker::config::WorkerConfig;
use sqs_worker::handler::HandlerRegistry;
use sqs_worker::types::Environment;
use sqs_worker::worker::SequentialWorker;

/// Consume an SQS queue one message at a time
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the worker configuration file
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = WorkerConfig::from_file(&cli.config)?;
    config.logging.init()?;

    for option in &config.unexpected_options {
        warn!("Unexpected container option: {}", option);
    }

    let env = Environment::from_env();
    info!(
        "Starting sequential worker for {} in {} environment",
        config.queue, env
    );

    let registry = HandlerRegistry::with_builtins();
    let worker = match SequentialWorker::from_config(&config, &env, &registry).await {
        Ok(worker) => worker,
        Err(e) => {
            error!("Failed to create worker: {}", e);
            return Err(e.into());
        }
    };

    // Spawn signal handler
    let signal_shutdown = worker.shutdown_token();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating graceful shutdown...");
                signal_shutdown.cancel();
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    worker.run().await;

    info!("Sequential worker exited");
    Ok(())
}
