//! Subsystem for exposing and calling unary RPC procedures.
//!
//! It's recommended to declare services via the
//! [`rpc_service!`][crate::rpc_service] macro. When using that macro, it's
//! rarely necessary to name the traits in this module directly, although
//! [`Listener`] is always needed to serve a handler.

mod client;
mod error;
mod macros;
mod server;
mod service;

pub use client::RpcClient;
pub use error::{RpcError, RpcResult};
pub use server::{Listener, Readiness};
pub use service::{RpcHandler, RpcMessage, RpcService};
