//! A small interconnect for services that each serve one RPC procedure to a
//! peer and call one procedure on it.

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod rpc;
pub mod testing;

pub use config::{Linger, ServiceConfig};
pub use coordinator::{Coordinator, Peer, Phase};
pub use error::{Error, Result};

/// Log an error and exit the process with status 1.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        ::log::error!($($arg)*);
        ::std::process::exit(1)
    }};
}

/// Report `e` at the process boundary and exit.
pub fn exit_with(e: Error) -> ! {
    fatal!("{}", diagnostic(&e))
}

/// Every error that reaches the process boundary ends it. A transient call
/// failure is marked as such, since it was not retried.
fn diagnostic(e: &Error) -> String {
    if e.is_fatal() {
        format!("fatal: {e}")
    } else {
        format!("fatal: {e} (transient, not retried)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::RpcError;

    #[test]
    fn transient_call_failure_is_still_fatal_at_exit() {
        let e = Error::Call(RpcError::Downstream(
            "GreeterService.SayHello".to_owned(),
            Box::new(RpcError::Unavailable("could not connect".to_owned())),
        ));
        let msg = diagnostic(&e);
        assert!(msg.starts_with("fatal: call failed: GreeterService.SayHello"), "{msg}");
        assert!(msg.ends_with("(transient, not retried)"), "{msg}");
        assert_eq!(msg.matches("call failed").count(), 1, "{msg}");
    }

    #[test]
    fn config_error_diagnostic() {
        let e = Error::Config("bad key".to_owned());
        assert_eq!(diagnostic(&e), "fatal: config error: bad key");
    }
}
