// Tracing subscriber setup for the CLI
//
// Logs go to stderr so stdout stays clean JSON.

use std::io;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(String),
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Filter string: `RUST_LOG` when set, else this crate at info; `debug` wins over both
fn filter_directives(debug: bool, env: Option<String>) -> String {
    let crate_name = env!("CARGO_CRATE_NAME");
    match (debug, env) {
        (true, _) => format!("{}=debug,hyper=warn,reqwest=warn", crate_name),
        (false, Some(directives)) if !directives.trim().is_empty() => directives,
        (false, _) => format!("{}=info,hyper=warn,reqwest=warn", crate_name),
    }
}

pub fn init_logging(debug: bool) -> Result<(), LoggingError> {
    let directives = filter_directives(debug, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directives).map_err(|e| LoggingError::Filter(e.to_string()))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(debug)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}
