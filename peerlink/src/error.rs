use std::{fmt, time::Duration};

use crate::rpc::RpcError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that reach the process boundary.
#[derive(Debug)]
pub enum Error {
    /// The listener could not acquire its address.
    Bind { addr: String, source: std::io::Error },

    /// The listener stopped accepting connections.
    Serve(std::io::Error),

    /// Something we were waiting on did not become ready in time.
    NotReady { what: String, after: Duration },

    /// The one outbound call failed.
    Call(RpcError),

    /// The listener task finished without reporting an error.
    ListenerExited(String),

    /// The configuration could not be loaded.
    Config(String),
}

impl Error {
    /// Whether the error leaves the process unable to carry on. A call that
    /// failed for a transient reason is the only non-fatal case; the
    /// coordinator still does not retry it.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Call(e) => !e.is_recoverable(),
            _ => true,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bind { addr, source } => write!(f, "failed to listen on {addr}: {source}"),
            Error::Serve(e) => write!(f, "listener failed: {e}"),
            Error::NotReady { what, after } => write!(f, "{what} not ready after {after:?}"),
            Error::Call(e) => write!(f, "call failed: {e}"),
            Error::ListenerExited(s) => write!(f, "listener exited: {s}"),
            Error::Config(s) => write!(f, "config error: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Bind { source, .. } => Some(source),
            Error::Serve(e) => Some(e),
            Error::Call(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RpcError> for Error {
    fn from(value: RpcError) -> Self {
        Error::Call(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Config(format!("toml error: {value}"))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        match value.try_into_panic() {
            Ok(e) => std::panic::resume_unwind(e),
            Err(e) => match e.is_cancelled() {
                true => Error::ListenerExited("task cancelled".to_owned()),
                false => Error::ListenerExited("tokio join error".to_owned()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_failure_is_fatal() {
        let e = Error::Bind {
            addr: "0.0.0.0:8081".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert!(e.is_fatal());
        assert!(e.to_string().starts_with("failed to listen on 0.0.0.0:8081"));
    }

    #[test]
    fn transient_call_failure_is_not_fatal() {
        let e = Error::from(RpcError::Downstream(
            "GreeterService.SayHello".to_owned(),
            Box::new(RpcError::Unavailable("connection refused".to_owned())),
        ));
        assert!(!e.is_fatal());
        assert!(Error::Call(RpcError::Handler("rejected".to_owned())).is_fatal());
    }
}
