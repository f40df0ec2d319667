use serde::{Serialize, de::DeserializeOwned};

use crate::rpc::RpcResult;

/// A value that can be used as an RPC request or response.
///
/// Anything serde can round-trip qualifies; there is nothing to implement.
pub trait RpcMessage: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T: Serialize + DeserializeOwned + Send + Sync + 'static> RpcMessage for T {}

/// The contract for a service exposing a single unary procedure.
///
/// The `Kind` type generated by [`rpc_service!`][crate::rpc_service] is
/// automatically given an `RpcService` impl.
pub trait RpcService: Send + Sync + 'static {
    type Request: RpcMessage;
    type Response: RpcMessage;

    const SERVICE: &'static str;
    const PROCEDURE: &'static str;

    /// `SERVICE.PROCEDURE`, used to label errors and log lines.
    fn label() -> String {
        format!("{}.{}", Self::SERVICE, Self::PROCEDURE)
    }

    /// The HTTP path the procedure is served at.
    fn path() -> String {
        format!("/rpc/{}/{}", Self::SERVICE, Self::PROCEDURE)
    }
}

/// The server side of an `RpcService`.
///
/// A handler may return an error, which is sent back to the caller as a failed
/// call. The listener keeps serving either way.
pub trait RpcHandler: Send + Sync + 'static {
    type Service: RpcService;

    fn handle(
        &self,
        q: <Self::Service as RpcService>::Request,
    ) -> impl Future<Output = RpcResult<<Self::Service as RpcService>::Response>> + Send;
}
