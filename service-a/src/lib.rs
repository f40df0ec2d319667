//! Service A: exposes StatusService and calls GreeterService on Service B.

use std::time::Duration;

use peerlink::{Coordinator, Linger, ServiceConfig, rpc::Listener};
use peerlink_schemas::status;

pub mod caller;
pub mod handler;

pub use handler::StatusHandler;

pub const NAME: &str = "Service A";

pub fn defaults() -> ServiceConfig {
    ServiceConfig::new(NAME, "0.0.0.0:8081", "localhost:8080", Duration::from_secs(5))
        .with_linger(Linger::Exit)
}

pub fn listener(cf: &ServiceConfig) -> Listener {
    Listener::new(cf.name.as_str(), cf.listen.as_str()).serve(status::service(StatusHandler))
}

pub fn coordinator(cf: ServiceConfig) -> Coordinator {
    let listener = listener(&cf);
    Coordinator::new(cf, listener)
}

pub async fn run(cf: ServiceConfig) -> peerlink::Result<()> {
    coordinator(cf).run(caller::call_peer).await
}
