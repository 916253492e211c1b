//! Line-oriented request session.
//!
//! Each non-blank input line is one JSON request, tagged by `op`:
//!
//! ```text
//! {"op":"invoke","name":"pair","args":["1","\"b\""],"kwargs":{}}
//! {"op":"read_attribute","path":"settings.owner.name"}
//! {"op":"lookup_by_id","id":"3"}
//! ```
//!
//! Argument payloads are JSON text handed to the exporter's decoder, so a
//! string argument is written as `"\"text\""`.
//!
//! Every request is answered by exactly one output entry: a rendered document
//! followed by a newline, or an empty line when `lookup_by_id` finds nothing.
//! Lines that cannot be parsed as a request are answered with a `raise`
//! document of type `MalformedRequest`. All requests of a session share one
//! exporter, so ids from earlier answers stay valid.
//!
//! The one-entry-per-line framing assumes compact documents. With an indent
//! configured, each document spans several lines and the empty-line miss
//! marker can no longer be told apart from document text; indentation is
//! meant for reading a session interactively, not for driving it from a
//! program.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use anyhow::Context;
use serde::Deserialize;
use telexml::{ArgumentDecoder, Document, Exporter, Fault, JsonDecoder, Target};
use tracing::{debug, warn};

/// One request of the session protocol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Invoke {
        name: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        kwargs: BTreeMap<String, String>,
    },
    ReadAttribute {
        path: String,
    },
    LookupById {
        id: String,
    },
}

impl Request {
    /// Parses one request line.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// The answer to one request.
#[derive(Debug)]
pub enum Reply {
    Document(Document),
    /// `lookup_by_id` found no value.
    NoResult,
}

/// Counters for one session run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub requests: usize,
    pub malformed: usize,
    pub misses: usize,
}

/// Dispatches requests to one long-lived exporter.
#[derive(Debug)]
pub struct Session<T, D = JsonDecoder> {
    exporter: Exporter<T, D>,
    stats: SessionStats,
}

impl<T: Target, D: ArgumentDecoder> Session<T, D> {
    pub fn new(exporter: Exporter<T, D>) -> Self {
        Self {
            exporter,
            stats: SessionStats::default(),
        }
    }

    pub fn exporter(&self) -> &Exporter<T, D> {
        &self.exporter
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Answers a parsed request.
    pub fn handle(&mut self, request: &Request) -> Reply {
        self.stats.requests += 1;
        match request {
            Request::Invoke { name, args, kwargs } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                let kwargs: Vec<(&str, &str)> = kwargs
                    .iter()
                    .map(|(key, payload)| (key.as_str(), payload.as_str()))
                    .collect();
                Reply::Document(self.exporter.invoke(name, &args, &kwargs))
            }
            Request::ReadAttribute { path } => {
                Reply::Document(self.exporter.read_attribute(path))
            }
            Request::LookupById { id } => match self.exporter.lookup_by_id(id) {
                Some(document) => Reply::Document(document),
                None => {
                    self.stats.misses += 1;
                    Reply::NoResult
                }
            },
        }
    }

    /// Answers one input line; blank lines yield no reply.
    pub fn handle_line(&mut self, line: &str) -> Option<Reply> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match Request::parse(line) {
            Ok(request) => {
                debug!(request = ?request, "Handling request");
                Some(self.handle(&request))
            }
            Err(err) => {
                warn!(error = %err, "Malformed request line");
                self.stats.requests += 1;
                self.stats.malformed += 1;
                let fault = Fault::new("MalformedRequest", err.to_string());
                Some(Reply::Document(self.exporter.raise(&fault)))
            }
        }
    }

    /// Reads requests from `input` until end of input, writing one reply per
    /// request to `output`.
    pub fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<SessionStats>
    where
        R: BufRead,
        W: Write,
    {
        for (index, line) in input.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read request line {}", index + 1))?;
            let Some(reply) = self.handle_line(&line) else {
                continue;
            };

            if let Reply::Document(document) = reply {
                document
                    .write_to(&mut output)
                    .with_context(|| format!("failed to render reply to line {}", index + 1))?;
            }
            writeln!(output)?;
            output.flush()?;
        }
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_module;

    fn session() -> Session<telexml::Module> {
        Session::new(Exporter::new(demo_module()))
    }

    #[test]
    fn test_parse_requests() {
        let request = Request::parse(r#"{"op":"invoke","name":"echo","args":["1"]}"#).unwrap();
        assert_eq!(
            request,
            Request::Invoke {
                name: "echo".to_string(),
                args: vec!["1".to_string()],
                kwargs: BTreeMap::new(),
            }
        );

        let request = Request::parse(r#"{"op":"read_attribute","path":"answer"}"#).unwrap();
        assert_eq!(request, Request::ReadAttribute { path: "answer".to_string() });

        let request = Request::parse(r#"{"op":"lookup_by_id","id":"7"}"#).unwrap();
        assert_eq!(request, Request::LookupById { id: "7".to_string() });

        assert!(Request::parse(r#"{"op":"delete"}"#).is_err());
        assert!(Request::parse(r#"{"op":"read_attribute"}"#).is_err());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let mut session = session();
        assert!(session.handle_line("   ").is_none());
        assert_eq!(session.stats().requests, 0);
    }

    #[test]
    fn test_malformed_line_is_raise() {
        let mut session = session();
        let Some(Reply::Document(document)) = session.handle_line("{not json") else {
            panic!("expected a document");
        };
        assert_eq!(document.root().tag(), "raise");
        assert_eq!(document.root().attribute("exception"), Some("MalformedRequest"));
        assert_eq!(session.stats().malformed, 1);
    }

    #[test]
    fn test_lookup_miss_is_no_result() {
        let mut session = session();
        let reply = session.handle(&Request::LookupById { id: "42".to_string() });
        assert!(matches!(reply, Reply::NoResult));
        assert_eq!(session.stats().misses, 1);
    }

    #[test]
    fn test_run_writes_one_entry_per_request() {
        let input = concat!(
            r#"{"op":"read_attribute","path":"answer"}"#,
            "\n\n",
            r#"{"op":"lookup_by_id","id":"99"}"#,
            "\n",
        );
        let mut output = Vec::new();
        let stats = session().run(input.as_bytes(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output, "<?xml version=\"1.0\"?><int value=\"42\"/>\n\n");
        assert_eq!(stats.requests, 2);
        assert_eq!(stats.misses, 1);
    }
}
