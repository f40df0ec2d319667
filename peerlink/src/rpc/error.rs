use std::fmt;

use serde::{Deserialize, Serialize};

pub type RpcResult<T> = std::result::Result<T, RpcError>;

/// An error when making an RPC call.
///
/// Values of this type travel over the wire: a handler that returns an
/// `RpcError` has it serialized into the response body, and the caller gets
/// the same value back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpcError {
    /// The peer could not be reached at all, e.g. the connection was refused
    /// or timed out. These can generally be assumed to be transient.
    Unavailable(String),

    /// The remote handler ran and returned an error.
    Handler(String),

    /// A miscellaneous error with an unstructured string message. These should
    /// generally be assumed to be unrecoverable.
    Misc(String),

    /// An error together with the procedure it came from. This variant is
    /// constructed automatically by `RpcClient` when making a call. Use
    /// `root_cause` to get the innermost `RpcError`.
    Downstream(String, Box<RpcError>),
}

impl RpcError {
    /// Unwrap layers of caused-by nesting to get the innermost error.
    pub fn root_cause(&self) -> &RpcError {
        match self {
            RpcError::Downstream(_, e) => e.root_cause(),
            _ => self,
        }
    }

    /// Whether a later attempt at the same call could plausibly succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RpcError::Unavailable(_) => true,
            RpcError::Handler(_) => false,
            RpcError::Misc(_) => false,
            RpcError::Downstream(_, e) => e.is_recoverable(),
        }
    }
}

impl axum::response::IntoResponse for RpcError {
    fn into_response(self) -> axum::response::Response {
        let res = (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(self),
        );
        res.into_response()
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::Unavailable(s) => write!(f, "unavailable: {s}"),
            RpcError::Handler(s) => write!(f, "handler error: {s}"),
            RpcError::Misc(s) => write!(f, "rpc error: {s}"),
            RpcError::Downstream(at, e) => write!(f, "{at}: {e}"),
        }
    }
}

impl std::error::Error for RpcError {}

impl From<String> for RpcError {
    fn from(s: String) -> Self {
        RpcError::Misc(s)
    }
}

impl From<&str> for RpcError {
    fn from(value: &str) -> Self {
        RpcError::Misc(value.to_owned())
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(value: reqwest::Error) -> Self {
        let origin = match value.url() {
            Some(u) => u.origin().ascii_serialization(),
            None => "(unknown)".to_owned(),
        };
        if value.is_timeout() {
            RpcError::Unavailable(format!("http timeout at {origin}"))
        } else if value.is_connect() {
            RpcError::Unavailable(format!("could not connect to {origin}: {value}"))
        } else {
            RpcError::Misc(format!("http error: {value}"))
        }
    }
}
