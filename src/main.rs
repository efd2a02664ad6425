use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("midmove=info")),
        )
        .init();
}

fn main() -> ExitCode {
    init_logging();

    match midmove::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(event = "app.fatal", error = %err);
            ExitCode::FAILURE
        }
    }
}
