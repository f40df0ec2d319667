use peerlink::{Peer, rpc::RpcResult};
use peerlink_schemas::{StatusRequest, StatusResponse, status};

use crate::NAME;

pub const STATUS: &str = "Running";

pub async fn report_status(peer: &Peer) -> RpcResult<StatusResponse> {
    let client = status::Client::connect(&peer.addr)?.with_timeout(peer.timeout);
    client
        .report_status(StatusRequest {
            service_name: NAME.to_owned(),
            status: STATUS.to_owned(),
        })
        .await
}

pub async fn call_peer(peer: Peer) -> RpcResult<()> {
    let res = report_status(&peer).await?;
    log::info!(
        "received ReportStatus acknowledgment from {}: {}",
        peer.addr,
        res.acknowledgment
    );
    Ok(())
}
