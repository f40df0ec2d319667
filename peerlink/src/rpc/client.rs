use std::{marker::PhantomData, time::Duration};

use crate::rpc::{RpcError, RpcResult, RpcService};

/// A client for calling one procedure on a peer.
///
/// Nothing is opened until the first call; the underlying connection pool
/// lives as long as the client and is released when it is dropped.
///
/// The `Client` struct defined by the [`rpc_service!`][crate::rpc_service]
/// macro is a thin wrapper around this type.
pub struct RpcClient<S> {
    http: reqwest::Client,
    url: reqwest::Url,
    timeout: Option<Duration>,
    service: PhantomData<S>,
}

impl<S: RpcService> Clone for RpcClient<S> {
    fn clone(&self) -> Self {
        RpcClient {
            http: self.http.clone(),
            url: self.url.clone(),
            timeout: self.timeout,
            service: PhantomData,
        }
    }
}

impl<S: RpcService> RpcClient<S> {
    /// Prepare a client for the peer listening at `addr` (`host:port`).
    pub fn connect(addr: &str) -> RpcResult<RpcClient<S>> {
        Self::connect_inner(addr).map_err(|e| RpcError::Downstream(S::label(), Box::new(e)))
    }

    fn connect_inner(addr: &str) -> RpcResult<RpcClient<S>> {
        let url = format!("http://{}{}", addr, S::path());
        let url = reqwest::Url::parse(&url)
            .map_err(|e| RpcError::Misc(format!("bad peer address {addr:?}: {e}")))?;
        let http = reqwest::Client::builder().build()?;
        Ok(RpcClient {
            http,
            url,
            timeout: None,
            service: PhantomData,
        })
    }

    /// Bound each call by `timeout`. `None` leaves it to the transport.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> RpcClient<S> {
        self.timeout = timeout;
        self
    }

    /// Send a request once. There is no retry.
    pub async fn call(&self, q: &S::Request) -> RpcResult<S::Response> {
        self.call_inner(q)
            .await
            .map_err(|e| RpcError::Downstream(S::label(), Box::new(e)))
    }

    async fn call_inner(&self, q: &S::Request) -> RpcResult<S::Response> {
        log::debug!("outgoing RPC: {} -> {}", S::label(), self.url);
        let mut req = self.http.post(self.url.clone()).json(q);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let msg = resp
                .json::<RpcError>()
                .await
                .unwrap_or_else(|e| RpcError::Misc(format!("{status} with no error body: {e}")));
            return Err(msg);
        }
        resp.json::<S::Response>()
            .await
            .map_err(|e| RpcError::Misc(format!("failed to parse response: {e}")))
    }
}
