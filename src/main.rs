use homework_status_bot::{Config, build_poller, config::LoggingConfig, logging, run_with_shutdown};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Without a valid config there is no log file setting either
            logging::init(&LoggingConfig::default());
            error!(critical = true, error = %e, "refusing to start, check environment variables");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.logging);
    info!(
        endpoint = %config.poll.endpoint,
        chat_id = %config.credentials.telegram_chat_id,
        "starting homework status bot"
    );

    let poller = match build_poller(&config, chrono::Utc::now().timestamp()) {
        Ok(poller) => poller,
        Err(e) => {
            error!(critical = true, error = %e, "failed to initialize HTTP clients");
            return ExitCode::FAILURE;
        }
    };

    run_with_shutdown(poller).await;
    ExitCode::SUCCESS
}
