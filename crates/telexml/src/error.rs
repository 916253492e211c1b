//! Error types for exporting values.
//!
//! Two families are kept apart:
//!
//! - [`ExportError`] covers failures while rendering a document to text.
//!   These are real errors and are returned to the caller.
//! - [`InvokeError`] covers what can go wrong while resolving a target,
//!   decoding arguments or running the invoked member. These never escape
//!   the [`Exporter`](crate::Exporter): they are turned into a
//!   [`Fault`](crate::Fault) and rendered as a document.

use thiserror::Error;

use crate::fault::Fault;

/// Errors raised while rendering a document.
#[derive(Error, Debug)]
pub enum ExportError {
    /// XML writer error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error while writing the document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The rendered document was not valid UTF-8
    #[error("invalid UTF-8 in rendered document: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Failures of the resolve / decode / invoke pipeline.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// A name or path segment does not exist on its owner.
    #[error("'{owner}' has no attribute '{name}'")]
    AttributeNotFound { owner: String, name: String },

    /// The name exists but cannot be invoked.
    #[error("'{name}' is not callable")]
    NotCallable { name: String },

    /// An argument payload could not be decoded.
    #[error("malformed argument payload: {message}")]
    MalformedArgument { message: String },

    /// The invoked member raised a fault.
    #[error(transparent)]
    Raised(#[from] Fault),
}

impl InvokeError {
    /// Type name used for the fault this error becomes.
    pub fn kind(&self) -> &str {
        match self {
            InvokeError::AttributeNotFound { .. } => "AttributeNotFound",
            InvokeError::NotCallable { .. } => "NotCallable",
            InvokeError::MalformedArgument { .. } => "MalformedArgument",
            InvokeError::Raised(fault) => fault.type_name(),
        }
    }
}

impl From<serde_json::Error> for InvokeError {
    fn from(err: serde_json::Error) -> Self {
        InvokeError::MalformedArgument {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_error_messages() {
        let err = InvokeError::AttributeNotFound {
            owner: "demo".to_string(),
            name: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "'demo' has no attribute 'missing'");
        assert_eq!(err.kind(), "AttributeNotFound");

        let err = InvokeError::NotCallable {
            name: "answer".to_string(),
        };
        assert_eq!(err.to_string(), "'answer' is not callable");
    }

    #[test]
    fn test_json_error_becomes_malformed_argument() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = InvokeError::from(json_err);
        assert_eq!(err.kind(), "MalformedArgument");
        assert!(err.to_string().starts_with("malformed argument payload:"));
    }

    #[test]
    fn test_raised_fault_keeps_its_type_name() {
        let err = InvokeError::from(Fault::new("ZeroDivision", "division by zero"));
        assert_eq!(err.kind(), "ZeroDivision");
        assert_eq!(err.to_string(), "ZeroDivision: division by zero");
    }
}
