//! Kudos entry point: runs reward cycles until interrupted.

use std::io::{self, Write};
use std::process::ExitCode;

use kudos::{
    BonuslyGateway, InMemoryLedger, KudosConfig, KudosError, LedgerKind, NullLedger,
    OctocrabGateway, ProcessedLedger, RewardPipeline, Scheduler,
};
use ortho_config::OrthoConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kudos=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), KudosError> {
    let config = load_config()?;
    config.validate()?;

    match config.ledger_kind()? {
        LedgerKind::Memory => serve(&config, InMemoryLedger::new()).await,
        LedgerKind::None => serve(&config, NullLedger).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`KudosError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<KudosConfig, KudosError> {
    KudosConfig::load().map_err(|error| KudosError::Configuration {
        message: error.to_string(),
    })
}

async fn serve<Ledger>(config: &KudosConfig, ledger: Ledger) -> Result<(), KudosError>
where
    Ledger: ProcessedLedger + 'static,
{
    let token = config.resolve_github_token()?;
    let code_host = OctocrabGateway::for_token(&token, config.github_api_url())?;
    let rewards = BonuslyGateway::new(config.rewards_config()?)?;
    let pipeline = RewardPipeline::new(code_host, rewards, ledger, config.pipeline_options()?);

    if config.once {
        pipeline.run_cycle().await?;
        return Ok(());
    }

    let scheduler = Scheduler::new(pipeline, config.poll_interval()?);
    let summary = scheduler.run_until(shutdown_signal()).await;
    tracing::info!(
        "stopped after {} completed, {} failed and {} skipped cycles",
        summary.completed,
        summary.failed,
        summary.skipped
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("could not listen for ctrl-c, stopping: {error}");
    }
}
