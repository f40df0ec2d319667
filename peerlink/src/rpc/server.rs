use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::sync::SetOnce;

use crate::{
    error::{Error, Result},
    rpc::{RpcError, RpcHandler, RpcResult, RpcService},
};

/// Signalled by a [`Listener`] once its port is bound, carrying the address it
/// actually bound to.
///
/// Clones share the same signal. It can be set at most once.
#[derive(Clone)]
pub struct Readiness(Arc<SetOnce<SocketAddr>>);

impl Readiness {
    pub fn new() -> Readiness {
        Readiness(Arc::new(SetOnce::new()))
    }

    pub(crate) fn signal(&self, addr: SocketAddr) {
        if self.0.set(addr).is_err() {
            log::warn!("readiness for {addr} was already signalled");
        }
    }

    pub fn get(&self) -> Option<SocketAddr> {
        self.0.get().copied()
    }

    pub async fn wait(&self) -> SocketAddr {
        *self.0.wait().await
    }

    /// Like `wait`, but gives up after `limit`.
    pub async fn wait_timeout(&self, limit: Duration) -> Option<SocketAddr> {
        tokio::time::timeout(limit, self.wait()).await.ok()
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts incoming calls on one address and dispatches them to the handlers
/// registered with [`serve`][Listener::serve].
pub struct Listener {
    name: String,
    addr: String,
    app: axum::Router,
    procedures: Vec<String>,
}

impl Listener {
    pub fn new<N: Into<String>, A: Into<String>>(name: N, addr: A) -> Listener {
        Listener {
            name: name.into(),
            addr: addr.into(),
            app: axum::Router::new().fallback(no_procedure),
            procedures: Vec::new(),
        }
    }

    /// Register a handler. Panics if the same procedure is registered twice.
    pub fn serve<H: RpcHandler>(mut self, handler: H) -> Listener {
        let label = <H::Service as RpcService>::label();
        assert!(
            !self.procedures.contains(&label),
            "{label} is already served by {}",
            self.name
        );

        let handler = Arc::new(handler);
        let route = axum::routing::post(move |body: axum::body::Bytes| {
            let handler = handler.clone();
            async move { dispatch(&*handler, &body).await }
        });
        self.app = self.app.route(&<H::Service as RpcService>::path(), route);
        self.procedures.push(label);
        self
    }

    pub fn procedures(&self) -> &[String] {
        &self.procedures
    }

    /// Bind and serve until the process ends. `ready` is signalled as soon as
    /// the port is bound.
    pub async fn run(self, ready: Readiness) -> Result<()> {
        let bind_err = |source: std::io::Error| Error::Bind {
            addr: self.addr.clone(),
            source,
        };
        let listener = tokio::net::TcpListener::bind(self.addr.as_str())
            .await
            .map_err(bind_err)?;
        let local = listener.local_addr().map_err(bind_err)?;

        log::info!(
            "{} listening on {} ({})",
            self.name,
            local,
            self.procedures.join(", ")
        );
        ready.signal(local);

        axum::serve(listener, self.app).await.map_err(Error::Serve)
    }
}

async fn dispatch<H: RpcHandler>(
    handler: &H,
    body: &[u8],
) -> RpcResult<axum::Json<<H::Service as RpcService>::Response>> {
    let q: <H::Service as RpcService>::Request = match serde_json::from_slice(body) {
        Ok(q) => q,
        Err(e) => return Err(RpcError::Misc(format!("request parse error: {e}"))),
    };
    let a = handler.handle(q).await?;
    Ok(axum::Json(a))
}

async fn no_procedure(uri: axum::http::Uri) -> RpcError {
    RpcError::Misc(format!("no procedure at {uri}"))
}
