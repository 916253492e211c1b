//! Command line configuration.
//!
//! Every flag can also be set through an environment variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TELEXML_LOG_LEVEL` | info | Log level |
//! | `TELEXML_MAX_DEPTH` | 256 | Nesting bound for expansion (0 = unbounded) |
//! | `TELEXML_INDENT` | - | Spaces per level in rendered documents (interactive use) |
//! | `TELEXML_INPUT` | - | Request file (stdin when unset) |
//!
//! # Example
//!
//! ```rust
//! use telexml_cli::CliConfig;
//!
//! let config = CliConfig {
//!     indent: Some(2),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.export_options().indent, Some(2));
//! ```

use std::path::PathBuf;

use clap::Parser;
use telexml::{DEFAULT_MAX_DEPTH, ExportOptions};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Upper bound accepted for `--indent`.
pub const MAX_INDENT: usize = 16;

/// Configuration of the `telexml` request session.
#[derive(Debug, Clone, Parser)]
#[command(name = "telexml-cli")]
#[command(about = "Answers introspection requests with XML documents")]
pub struct CliConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "TELEXML_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum nesting of expanded complex values; 0 disables the bound.
    #[arg(long, env = "TELEXML_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Indent rendered documents by this many spaces per level. Documents
    /// then span several lines, so this is meant for interactive use.
    #[arg(long, env = "TELEXML_INDENT")]
    pub indent: Option<usize>,

    /// Read requests from this file instead of stdin.
    #[arg(short, long, env = "TELEXML_INPUT")]
    pub input: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            indent: None,
            input: None,
        }
    }
}

impl CliConfig {
    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Unknown log level '{}', expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        if let Some(indent) = self.indent {
            if indent > MAX_INDENT {
                errors.push(format!("Indent cannot exceed {}", MAX_INDENT));
            }
        }

        if let Some(input) = &self.input {
            if input.as_os_str().is_empty() {
                errors.push("Input path cannot be empty".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Export options for the session's exporter.
    pub fn export_options(&self) -> ExportOptions {
        let max_depth = match self.max_depth {
            0 => None,
            depth => Some(depth),
        };
        ExportOptions::default()
            .with_max_depth(max_depth)
            .with_indent(self.indent)
    }

    /// Creates a config for testing purposes.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            max_depth: 32,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.input.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_export_options() {
        let config = CliConfig {
            max_depth: 8,
            indent: Some(4),
            ..Default::default()
        };
        let options = config.export_options();
        assert_eq!(options.max_depth, Some(8));
        assert_eq!(options.indent, Some(4));
    }

    #[test]
    fn test_zero_depth_means_unbounded() {
        let config = CliConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert_eq!(config.export_options().max_depth, None);
    }

    #[test]
    fn test_validation() {
        let config = CliConfig {
            log_level: "loud".to_string(),
            indent: Some(MAX_INDENT + 1),
            input: Some(PathBuf::new()),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("loud"));

        let config = CliConfig {
            log_level: "DEBUG".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let config = CliConfig::try_parse_from([
            "telexml-cli",
            "--max-depth",
            "0",
            "--indent",
            "2",
            "-i",
            "requests.jsonl",
        ])
        .unwrap();
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.indent, Some(2));
        assert_eq!(config.input, Some(PathBuf::from("requests.jsonl")));
    }

    #[test]
    fn test_for_testing() {
        let config = CliConfig::for_testing();
        assert_eq!(config.log_level, "debug");
        assert!(config.validate().is_ok());
    }
}
