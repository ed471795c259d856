use std::process::ExitCode;

use cosmos_exporter::config::{load_config, ConfigError};
use cosmos_exporter::lifecycle::{self, StartupError};
use cosmos_exporter::observability::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    match launch().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => exit_with(e),
    }
}

async fn launch() -> Result<(), StartupError> {
    let config = match load_config() {
        // --help, --version and usage errors print through clap.
        Err(ConfigError::Cli(e)) => e.exit(),
        result => result?,
    };

    init_logging(&config.log_level, config.json_output)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cosmos-exporter starting");
    config.log_config();

    lifecycle::run(config).await
}

fn exit_with(error: StartupError) -> ExitCode {
    if error.before_logging() {
        eprintln!("cosmos-exporter: {error}");
    } else {
        tracing::error!(error = %error, phase = %error.phase(), "Exporter terminated");
    }
    ExitCode::from(error.exit_code())
}
