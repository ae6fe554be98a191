//! DNS over UDP (RFC 1035 §4.2.1). Messages are sent as-is, no framing.

use super::transport_error;
use indns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest datagram accepted from an upstream (EDNS(0) sized).
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub async fn send(
    server: SocketAddr,
    message_bytes: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    let bind_addr: SocketAddr = if server.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| transport_error(server, format!("bind failed: {}", e)))?;

    let bytes_sent = tokio::time::timeout(timeout, socket.send_to(message_bytes, server))
        .await
        .map_err(|_| transport_error(server, "timeout sending UDP query"))?
        .map_err(|e| transport_error(server, format!("send failed: {}", e)))?;

    debug!(server = %server, bytes_sent, "UDP query sent");

    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

    let (bytes_received, from_addr) =
        tokio::time::timeout(timeout, socket.recv_from(&mut recv_buf))
            .await
            .map_err(|_| transport_error(server, "timeout waiting for UDP response"))?
            .map_err(|e| transport_error(server, format!("receive failed: {}", e)))?;

    if from_addr.ip() != server.ip() {
        warn!(
            expected = %server,
            received_from = %from_addr,
            "UDP response from unexpected source"
        );
    }

    recv_buf.truncate(bytes_received);

    debug!(server = %server, bytes_received, "UDP response received");

    Ok(recv_buf)
}
