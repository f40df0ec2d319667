use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    cli::Args,
    error::{Error, Result},
};

/// How long to wait for a listener to bind, unless configured otherwise.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// What the coordinator does once its single call has completed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Linger {
    /// Stop the listener and return.
    Exit,
    /// Keep serving inbound calls until the process is terminated.
    Forever,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub listen: String,
    pub peer: String,
    pub grace_ms: u64,
    pub ready_timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_timeout_ms: Option<u64>,
    pub linger: Linger,
}

/// The on-disk form of a [`ServiceConfig`]. Every key is optional and
/// overrides the built-in default for the service.
#[derive(Default, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfigToml {
    pub name: Option<String>,
    pub listen: Option<String>,
    pub peer: Option<String>,
    pub grace_ms: Option<u64>,
    pub ready_timeout_ms: Option<u64>,
    pub call_timeout_ms: Option<u64>,
    pub linger: Option<Linger>,
}

impl ServiceConfig {
    pub fn new<N, L, P>(name: N, listen: L, peer: P, grace: Duration) -> ServiceConfig
    where
        N: Into<String>,
        L: Into<String>,
        P: Into<String>,
    {
        ServiceConfig {
            name: name.into(),
            listen: listen.into(),
            peer: peer.into(),
            grace_ms: millis(grace),
            ready_timeout_ms: millis(DEFAULT_READY_TIMEOUT),
            call_timeout_ms: None,
            linger: Linger::Forever,
        }
    }

    pub fn with_linger(mut self, linger: Linger) -> ServiceConfig {
        self.linger = linger;
        self
    }

    pub fn with_listen<S: Into<String>>(mut self, listen: S) -> ServiceConfig {
        self.listen = listen.into();
        self
    }

    pub fn with_peer<S: Into<String>>(mut self, peer: S) -> ServiceConfig {
        self.peer = peer.into();
        self
    }

    pub fn with_grace(mut self, grace: Duration) -> ServiceConfig {
        self.grace_ms = millis(grace);
        self
    }

    pub fn with_ready_timeout(mut self, limit: Duration) -> ServiceConfig {
        self.ready_timeout_ms = millis(limit);
        self
    }

    pub fn with_call_timeout(mut self, limit: Option<Duration>) -> ServiceConfig {
        self.call_timeout_ms = limit.map(millis);
        self
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    pub fn apply(&mut self, over: ServiceConfigToml) {
        if let Some(x) = over.name {
            self.name = x;
        }
        if let Some(x) = over.listen {
            self.listen = x;
        }
        if let Some(x) = over.peer {
            self.peer = x;
        }
        if let Some(x) = over.grace_ms {
            self.grace_ms = x;
        }
        if let Some(x) = over.ready_timeout_ms {
            self.ready_timeout_ms = x;
        }
        if over.call_timeout_ms.is_some() {
            self.call_timeout_ms = over.call_timeout_ms;
        }
        if let Some(x) = over.linger {
            self.linger = x;
        }
    }

    pub fn apply_toml(&mut self, text: &str) -> Result<()> {
        let over: ServiceConfigToml = toml::from_str(text)?;
        self.apply(over);
        Ok(())
    }

    pub fn load(mut self, path: &Path) -> Result<ServiceConfig> {
        let text = match std::fs::read_to_string(path) {
            Ok(x) => x,
            Err(e) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        self.apply_toml(&text)?;
        Ok(self)
    }

    /// Layer the config file and command line flags in `args` over `self`.
    pub fn resolve(self, args: &Args) -> Result<ServiceConfig> {
        let mut cf = match &args.config {
            Some(path) => self.load(path)?,
            None => self,
        };
        cf.apply(ServiceConfigToml {
            listen: args.listen.clone(),
            peer: args.peer.clone(),
            grace_ms: args.grace_ms,
            ..Default::default()
        });
        Ok(cf)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(format!("could not dump config: {e}")))
    }
}

/// Durations too long for the millisecond keys saturate at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
