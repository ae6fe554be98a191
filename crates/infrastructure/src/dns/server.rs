use hickory_proto::op::{Message, MessageType};
use indns_application::use_cases::{failure_response, HandleDnsQueryUseCase};
use indns_domain::NetworkKind;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Wire-level entry point shared by the UDP and TCP listeners.
pub struct DnsRequestHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsRequestHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Decodes a query, routes it and encodes the reply. `None` means the
    /// input is dropped without answering.
    pub async fn handle_wire(&self, bytes: &[u8], network: NetworkKind) -> Option<Vec<u8>> {
        let request = match Message::from_vec(bytes) {
            Ok(message) => message,
            Err(e) => {
                debug!(network = %network, len = bytes.len(), error = %e, "Dropping undecodable query");
                return None;
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(id = request.id(), "Dropping message that is not a query");
            return None;
        }

        if let Some(query) = request.queries().first() {
            info!(
                domain = %query.name(),
                record_type = ?query.query_type(),
                network = %network,
                "DNS query received"
            );
        }

        let reply = self.use_case.execute(&request, network).await;

        match reply.message.to_vec() {
            Ok(encoded) => {
                debug!(id = request.id(), route = reply.route.as_str(), "Sending response");
                Some(encoded)
            }
            Err(e) => {
                error!(id = request.id(), error = %e, "Failed to encode response");
                failure_response(&request).to_vec().ok()
            }
        }
    }
}
