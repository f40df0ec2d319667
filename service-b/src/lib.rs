//! Service B: exposes GreeterService and calls StatusService on Service A.

use std::time::Duration;

use peerlink::{Coordinator, Linger, ServiceConfig, rpc::Listener};
use peerlink_schemas::greeter;

pub mod caller;
pub mod handler;

pub use handler::GreeterHandler;

pub const NAME: &str = "Service B";

pub fn defaults() -> ServiceConfig {
    ServiceConfig::new(NAME, "0.0.0.0:8080", "localhost:8081", Duration::from_secs(1))
        .with_linger(Linger::Forever)
}

pub fn listener(cf: &ServiceConfig) -> Listener {
    Listener::new(cf.name.as_str(), cf.listen.as_str()).serve(greeter::service(GreeterHandler))
}

pub fn coordinator(cf: ServiceConfig) -> Coordinator {
    let listener = listener(&cf);
    Coordinator::new(cf, listener)
}

/// Runs until the process is terminated, unless something fails.
pub async fn run(cf: ServiceConfig) -> peerlink::Result<()> {
    coordinator(cf).run(caller::call_peer).await
}
