use peerlink::rpc::RpcResult;
use peerlink_schemas::{HelloRequest, HelloResponse, greeter};

pub const REPLY: &str = "Hello back from B";

pub struct GreeterHandler;

impl greeter::Handler for GreeterHandler {
    async fn say_hello(&self, greeting: HelloRequest) -> RpcResult<HelloResponse> {
        log::info!("hello received from: {}", greeting.name);
        Ok(HelloResponse {
            message: REPLY.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use peerlink::testing::{capture_logs, take_logs};
    use peerlink_schemas::greeter::Handler;

    use super::*;

    #[tokio::test]
    async fn reply_ignores_the_name() {
        for name in ["ping", "", "Grüße aus A", "{\"not\": \"json\"}"] {
            let a = GreeterHandler
                .say_hello(HelloRequest {
                    name: name.to_owned(),
                })
                .await
                .unwrap();
            assert_eq!(a.message, REPLY);
        }
    }

    #[tokio::test]
    async fn greeting_name_is_logged() {
        capture_logs();
        GreeterHandler
            .say_hello(HelloRequest {
                name: "ping".to_owned(),
            })
            .await
            .unwrap();
        let logs = take_logs("service_b::handler");
        assert_eq!(logs.len(), 1);
        assert!(logs[0].message.contains("ping"), "{}", logs[0].message);
    }
}
