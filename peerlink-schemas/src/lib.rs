//! Messages and service contracts shared by Service A and Service B.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub service_name: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub acknowledgment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
}

/// Exposed by Service A.
pub mod status {
    use super::{StatusRequest, StatusResponse};

    peerlink::rpc_service! {
        service "StatusService";

        /// Tell the receiver what state the caller is in.
        rpc "ReportStatus" fn report_status(report: StatusRequest) -> StatusResponse;
    }
}

/// Exposed by Service B.
pub mod greeter {
    use super::{HelloRequest, HelloResponse};

    peerlink::rpc_service! {
        service "GreeterService";

        rpc "SayHello" fn say_hello(greeting: HelloRequest) -> HelloResponse;
    }
}
