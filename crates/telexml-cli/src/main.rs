//! telexml-cli
//!
//! Answers introspection requests on the `demo` target with XML documents.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use clap::Parser;
use telexml::Exporter;
use telexml_cli::{CliConfig, Session, demo_module, init_logging};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let options = config.export_options();
    info!(
        max_depth = ?options.max_depth,
        indent = ?options.indent,
        input = ?config.input,
        "Starting telexml session"
    );

    if options.indent.is_some() {
        warn!("Indented documents span several lines; responses are no longer one per line");
    }

    let exporter = Exporter::new(demo_module()).with_options(options);
    let mut session = Session::new(exporter);
    let output = io::stdout().lock();

    let stats = match &config.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open request file {}", path.display()))?;
            session.run(BufReader::new(file), output)?
        }
        None => session.run(io::stdin().lock(), output)?,
    };

    info!(
        requests = stats.requests,
        malformed = stats.malformed,
        misses = stats.misses,
        registered = session.exporter().registry().len(),
        "Session finished"
    );

    Ok(())
}
