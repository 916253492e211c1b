//! # telexml-cli
//!
//! Serves introspection requests over a line-oriented session: requests are
//! read as JSON lines, answers are written as XML documents.
//!
//! - [`config`]: command line and environment configuration.
//! - [`demo`]: the built-in `demo` target.
//! - [`session`]: request parsing and dispatch to one [`telexml::Exporter`].

pub mod config;
pub mod demo;
pub mod session;

pub use config::CliConfig;
pub use demo::demo_module;
pub use session::{Reply, Request, Session, SessionStats};

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise both crates log at `level`. Logs
/// are written to stderr, leaving stdout to the documents.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("telexml={},telexml_cli={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
