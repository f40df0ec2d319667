use peerlink::rpc::RpcResult;
use peerlink_schemas::{StatusRequest, StatusResponse, status};

pub const ACKNOWLEDGMENT: &str = "ACK from Service A";

pub struct StatusHandler;

impl status::Handler for StatusHandler {
    async fn report_status(&self, report: StatusRequest) -> RpcResult<StatusResponse> {
        log::info!(
            "received ReportStatus from {}: {}",
            report.service_name,
            report.status
        );
        Ok(StatusResponse {
            acknowledgment: ACKNOWLEDGMENT.to_owned(),
        })
    }
}
