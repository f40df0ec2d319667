use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use peerlink::rpc::{Listener, Readiness, RpcError, RpcResult};

mod echo {
    peerlink::rpc_service! {
        service "EchoService";

        rpc "Echo" fn echo(text: String) -> String;
    }
}

mod other {
    peerlink::rpc_service! {
        service "OtherService";

        rpc "Other" fn other(x: u32) -> u32;
    }
}

struct Echo {
    calls: Arc<AtomicUsize>,
}

impl echo::Handler for Echo {
    async fn echo(&self, text: String) -> RpcResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match text.as_str() {
            "fail" => Err(RpcError::Handler("refusing to echo".to_owned())),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok(text)
            }
            _ => Ok(text),
        }
    }
}

async fn start() -> (SocketAddr, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let listener = Listener::new("echo", "127.0.0.1:0").serve(echo::service(Echo {
        calls: calls.clone(),
    }));
    let ready = Readiness::new();
    tokio::spawn(listener.run(ready.clone()));
    let addr = ready
        .wait_timeout(Duration::from_secs(5))
        .await
        .expect("listener did not bind");
    (addr, calls)
}

#[tokio::test]
async fn round_trip() {
    let (addr, calls) = start().await;
    let client = echo::Client::connect(&addr.to_string()).unwrap();
    assert_eq!(client.echo("hello".to_owned()).await.unwrap(), "hello");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handler_error_reaches_caller_and_listener_survives() {
    let (addr, calls) = start().await;
    let client = echo::Client::connect(&addr.to_string()).unwrap();

    let err = client.echo("fail".to_owned()).await.unwrap_err();
    assert_eq!(
        err,
        RpcError::Downstream(
            "EchoService.Echo".to_owned(),
            Box::new(RpcError::Handler("refusing to echo".to_owned()))
        )
    );
    assert!(!err.is_recoverable());

    assert_eq!(client.echo("still here".to_owned()).await.unwrap(), "still here");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn identical_calls_give_identical_bytes() {
    let (addr, _) = start().await;
    let url = format!("http://{addr}/rpc/EchoService/Echo");
    let http = reqwest::Client::new();

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let resp = http.post(&url).body("\"same\"").send().await.unwrap();
        assert!(resp.status().is_success());
        bodies.push(resp.bytes().await.unwrap());
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(&bodies[0][..], b"\"same\"");
}

#[tokio::test]
async fn malformed_request_is_rejected_without_calling_handler() {
    let (addr, calls) = start().await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/rpc/EchoService/Echo"))
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    match resp.json::<RpcError>().await.unwrap() {
        RpcError::Misc(msg) => assert!(msg.starts_with("request parse error"), "{msg}"),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_procedure() {
    let (addr, _) = start().await;
    let client = other::Client::connect(&addr.to_string()).unwrap();
    let err = client.other(3).await.unwrap_err();
    assert_eq!(
        err.root_cause(),
        &RpcError::Misc("no procedure at /rpc/OtherService/Other".to_owned())
    );
}

#[tokio::test]
async fn unreachable_peer_is_unavailable() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = echo::Client::connect(&closed.to_string()).unwrap();
    let err = client.echo("anyone?".to_owned()).await.unwrap_err();
    assert!(matches!(err.root_cause(), RpcError::Unavailable(_)), "{err}");
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn call_timeout_is_unavailable() {
    let (addr, _) = start().await;
    let client = echo::Client::connect(&addr.to_string())
        .unwrap()
        .with_timeout(Some(Duration::from_millis(50)));
    let err = client.echo("slow".to_owned()).await.unwrap_err();
    assert!(matches!(err.root_cause(), RpcError::Unavailable(_)), "{err}");
}

#[test]
fn bad_address_fails_at_connect() {
    let err = echo::Client::connect("not a host:port").err().unwrap();
    assert!(matches!(err.root_cause(), RpcError::Misc(_)), "{err}");
}

#[tokio::test]
async fn bind_conflict_is_reported() {
    let (addr, _) = start().await;
    let res = Listener::new("second", addr.to_string())
        .run(Readiness::new())
        .await;
    match res {
        Err(peerlink::Error::Bind { addr: a, .. }) => assert_eq!(a, addr.to_string()),
        other => panic!("expected bind failure, got {other:?}"),
    }
}

#[test]
#[should_panic(expected = "EchoService.Echo is already served by echo")]
fn duplicate_registration_panics() {
    let calls = Arc::new(AtomicUsize::new(0));
    let _ = Listener::new("echo", "127.0.0.1:0")
        .serve(echo::service(Echo {
            calls: calls.clone(),
        }))
        .serve(echo::service(Echo { calls }));
}
