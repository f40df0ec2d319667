/// A helper macro for declaring a single-procedure RPC service.
///
/// This is the recommended way to declare a service since it removes the
/// boilerplate of wiring a handler trait, a server adapter, and a client to
/// the same contract. The request and response types must be serializable
/// and deserializable via serde.
///
/// # Example
///
/// ```
/// mod echo {
///     peerlink::rpc_service! {
///         service "EchoService";
///
///         /// Send a string back unchanged.
///         rpc "Echo" fn echo(text: String) -> String;
///     }
/// }
///
/// pub struct Echo;
///
/// impl echo::Handler for Echo {
///     async fn echo(&self, text: String) -> peerlink::rpc::RpcResult<String> {
///         Ok(text)
///     }
/// }
///
/// let listener = peerlink::rpc::Listener::new("echo", "127.0.0.1:0").serve(echo::service(Echo));
/// assert_eq!(listener.procedures(), ["EchoService.Echo"]);
/// ```
///
/// The generated `Client` has an `impl` that behaves like the following:
///
/// ```ignore
/// impl Client {
///     pub fn connect(addr: &str) -> RpcResult<Client>;
///     pub fn with_timeout(self, timeout: Option<Duration>) -> Client;
///
///     pub async fn echo(&self, text: String) -> RpcResult<String>;
/// }
/// ```
#[macro_export]
macro_rules! rpc_service {
    {
        service $service:literal;

        $(#[$attr:meta])*
        rpc $procedure:literal fn $op:ident($arg:ident: $req:ty) -> $res:ty;
    } => {
        pub struct Kind;

        impl $crate::rpc::RpcService for Kind {
            type Request = $req;
            type Response = $res;

            const SERVICE: &'static str = $service;
            const PROCEDURE: &'static str = $procedure;
        }

        pub trait Handler: Send + Sync + 'static {
            $(#[$attr])*
            fn $op(&self, $arg: $req)
            -> impl ::std::future::Future<Output = $crate::rpc::RpcResult<$res>> + Send;
        }

        pub struct Service<H>(pub H);

        impl<H: Handler> $crate::rpc::RpcHandler for Service<H> {
            type Service = Kind;

            fn handle(&self, q: $req)
            -> impl ::std::future::Future<Output = $crate::rpc::RpcResult<$res>> + Send {
                self.0.$op(q)
            }
        }

        /// Wrap a handler so it can be registered with a `Listener`.
        pub fn service<H: Handler>(handler: H) -> Service<H> {
            Service(handler)
        }

        pub struct Client($crate::rpc::RpcClient<Kind>);

        impl Clone for Client {
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl Client {
            pub fn connect(addr: &str) -> $crate::rpc::RpcResult<Client> {
                $crate::rpc::RpcClient::connect(addr).map(Client)
            }

            pub fn with_timeout(self, timeout: ::std::option::Option<::std::time::Duration>) -> Client {
                Client(self.0.with_timeout(timeout))
            }

            $(#[$attr])*
            pub async fn $op(&self, $arg: $req) -> $crate::rpc::RpcResult<$res> {
                self.0.call(&$arg).await
            }
        }
    }
}
