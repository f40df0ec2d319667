use peerlink::{Peer, rpc::RpcResult};
use peerlink_schemas::{HelloRequest, HelloResponse, greeter};

pub const GREETING_NAME: &str = "ping";

/// Call SayHello on the peer once. The client lives only for this call.
pub async fn say_hello(peer: &Peer) -> RpcResult<HelloResponse> {
    let client = greeter::Client::connect(&peer.addr)?.with_timeout(peer.timeout);
    client
        .say_hello(HelloRequest {
            name: GREETING_NAME.to_owned(),
        })
        .await
}

pub async fn call_peer(peer: Peer) -> RpcResult<()> {
    let res = say_hello(&peer).await?;
    log::info!("received SayHello response from {}: {}", peer.addr, res.message);
    Ok(())
}
