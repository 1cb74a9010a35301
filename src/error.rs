use thiserror::Error;

/// Errors surfaced by the utilities in this crate.
///
/// Query parsing and serialization never fail; malformed input degrades
/// into an empty or partial map. The variants below come from the
/// download helper, configuration loading and error normalization.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Resource URL not provided! You need to provide one")]
    MissingUrl,

    /// A native error normalized by [`handle_error`](crate::handle_error).
    #[error("Error: {0}")]
    Native(String),

    /// A plain string message normalized by [`handle_error`](crate::handle_error).
    #[error("Error: {0}")]
    Message(String),

    /// Any other caught value, rendered as JSON.
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A value caught at a failure boundary, before normalization.
#[derive(Debug)]
pub enum Caught {
    Error(Box<dyn std::error::Error + Send + Sync>),
    Message(String),
    Other(serde_json::Value),
}

impl From<&str> for Caught {
    fn from(s: &str) -> Self {
        Caught::Message(s.to_owned())
    }
}

impl From<String> for Caught {
    fn from(s: String) -> Self {
        Caught::Message(s)
    }
}

impl From<serde_json::Value> for Caught {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => Caught::Message(s),
            other => Caught::Other(other),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Caught {
    fn from(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Caught::Error(e)
    }
}

/// Normalizes a caught value into an [`Error`] and logs it.
///
/// The returned error is meant to be raised by the caller; nothing is
/// swallowed here.
///
/// ```
/// use client_utils::{Caught, handle_error};
///
/// let err = handle_error(Caught::from("boom"));
/// assert_eq!(err.to_string(), "Error: boom");
///
/// let err = handle_error(Caught::from(serde_json::json!({ "code": 7 })));
/// assert_eq!(err.to_string(), r#"Unknown error: {"code":7}"#);
/// ```
pub fn handle_error(caught: Caught) -> Error {
    match caught {
        Caught::Error(e) => {
            let message = e.to_string();
            tracing::error!("{message}");
            Error::Native(message)
        }
        Caught::Message(message) => {
            tracing::error!("{message}");
            Error::Message(message)
        }
        Caught::Other(value) => {
            tracing::error!(?value, "unknown error");
            Error::Unknown(value.to_string())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn native_errors_keep_their_message() {
        let io = std::io::Error::other("disk on fire");
        let err = handle_error(Caught::Error(Box::new(io)));
        assert!(matches!(err, Error::Native(_)));
        assert_eq!(err.to_string(), "Error: disk on fire");
    }

    #[test]
    fn json_strings_are_messages() {
        let err = handle_error(serde_json::json!("nope").into());
        assert!(matches!(err, Error::Message(_)));
        assert_eq!(err.to_string(), "Error: nope");
    }

    #[test]
    fn other_values_are_unknown() {
        let err = handle_error(serde_json::json!([1, null]).into());
        assert_eq!(err.to_string(), "Unknown error: [1,null]");

        let err = handle_error(serde_json::Value::Null.into());
        assert_eq!(err.to_string(), "Unknown error: null");
    }
}
