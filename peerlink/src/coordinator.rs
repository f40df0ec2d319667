//! Startup sequencing for a service that both serves and calls its peer.
//!
//! A [`Coordinator`] owns the service's [`Listener`] and drives it through
//! `Starting → Listening → Waiting → Calling → Idle`. There is no way back
//! to an earlier phase and nothing is retried: any error ends [`run`] and,
//! with it, the listener task.
//!
//! [`run`]: Coordinator::run

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

use tokio::{
    sync::watch,
    task::{JoinError, JoinSet},
};

use crate::{
    config::{Linger, ServiceConfig},
    error::{Error, Result},
    rpc::{Listener, Readiness, RpcResult},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Listening,
    Waiting,
    Calling,
    Idle,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Starting => "starting",
            Phase::Listening => "listening",
            Phase::Waiting => "waiting",
            Phase::Calling => "calling",
            Phase::Idle => "idle",
        };
        f.write_str(s)
    }
}

/// Where the outbound call goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Peer {
    pub addr: String,
    pub timeout: Option<Duration>,
}

pub struct Coordinator {
    cf: ServiceConfig,
    listener: Listener,
    ready: Readiness,
    peer_ready: Option<Readiness>,
    phase: watch::Sender<Phase>,
}

impl Coordinator {
    pub fn new(cf: ServiceConfig, listener: Listener) -> Coordinator {
        let (phase, _) = watch::channel(Phase::Starting);
        Coordinator {
            cf,
            listener,
            ready: Readiness::new(),
            peer_ready: None,
            phase,
        }
    }

    /// The signal this service's listener sets once bound. Hand it to a peer's
    /// coordinator running in the same process via [`await_peer`].
    ///
    /// [`await_peer`]: Coordinator::await_peer
    pub fn readiness(&self) -> Readiness {
        self.ready.clone()
    }

    /// Wait for `peer` after the grace interval and call whatever address the
    /// peer actually bound, instead of the configured one.
    pub fn await_peer(mut self, peer: Readiness) -> Coordinator {
        self.peer_ready = Some(peer);
        self
    }

    pub fn phases(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Run the whole lifecycle, invoking `caller` exactly once.
    ///
    /// With [`Linger::Forever`] this only returns if the listener fails.
    pub async fn run<F, Fut>(self, caller: F) -> Result<()>
    where
        F: FnOnce(Peer) -> Fut,
        Fut: Future<Output = RpcResult<()>>,
    {
        let Coordinator {
            cf,
            listener,
            ready,
            peer_ready,
            phase,
        } = self;
        let enter = |next: Phase| {
            log::debug!("{}: {}", cf.name, next);
            phase.send_replace(next);
        };

        let mut tasks = JoinSet::new();
        tasks.spawn(listener.run(ready.clone()));

        let bound = tokio::select! {
            addr = ready.wait() => addr,
            Some(res) = tasks.join_next() => return Err(listener_exit(res)),
            _ = tokio::time::sleep(cf.ready_timeout()) => {
                return Err(Error::NotReady {
                    what: format!("{} listener", cf.name),
                    after: cf.ready_timeout(),
                });
            }
        };
        enter(Phase::Listening);
        log::debug!("{} bound {}", cf.name, bound);

        enter(Phase::Waiting);
        let wait = async {
            tokio::time::sleep(cf.grace()).await;
            match &peer_ready {
                Some(peer) => match peer.wait_timeout(cf.ready_timeout()).await {
                    Some(addr) => Ok(dial_addr(addr)),
                    None => Err(Error::NotReady {
                        what: "peer listener".to_owned(),
                        after: cf.ready_timeout(),
                    }),
                },
                None => Ok(cf.peer.clone()),
            }
        };
        let addr = tokio::select! {
            res = wait => res?,
            Some(res) = tasks.join_next() => return Err(listener_exit(res)),
        };

        enter(Phase::Calling);
        let peer = Peer {
            addr,
            timeout: cf.call_timeout(),
        };
        tokio::select! {
            res = caller(peer) => res?,
            Some(res) = tasks.join_next() => return Err(listener_exit(res)),
        }

        enter(Phase::Idle);
        match cf.linger {
            Linger::Exit => {
                tasks.shutdown().await;
                Ok(())
            }
            Linger::Forever => match tasks.join_next().await {
                Some(res) => Err(listener_exit(res)),
                None => Ok(()),
            },
        }
    }
}

fn listener_exit(res: std::result::Result<Result<()>, JoinError>) -> Error {
    match res {
        Ok(Err(e)) => e,
        Ok(Ok(())) => Error::ListenerExited("stopped serving".to_owned()),
        Err(e) => Error::from(e),
    }
}

/// An address a client can dial to reach a listener bound to `addr`.
fn dial_addr(mut addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        let ip: IpAddr = match addr {
            SocketAddr::V4(_) => Ipv4Addr::LOCALHOST.into(),
            SocketAddr::V6(_) => Ipv6Addr::LOCALHOST.into(),
        };
        addr.set_ip(ip);
    }
    addr.to_string()
}
