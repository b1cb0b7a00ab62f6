use std::process::ExitCode;
use timegit::{commands::Cli, libs::messages::macros::is_debug_mode, msg_error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Must run before the first `is_debug_mode()` call, which caches the result.
    let _ = dotenv::dotenv();

    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("timegit=debug")))
            .with_writer(std::io::stderr)
            .init();
    }

    match Cli::menu().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            msg_error!(format!("{:#}", error));
            ExitCode::FAILURE
        }
    }
}
