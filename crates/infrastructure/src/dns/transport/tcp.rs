//! DNS over TCP (RFC 1035 §4.2.2): each message carries a two-byte
//! big-endian length prefix.

use super::transport_error;
use indns_domain::DomainError;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

pub const MAX_TCP_MESSAGE_SIZE: usize = u16::MAX as usize;

/// One query per connection; the connection is closed afterwards.
pub async fn send(
    server: SocketAddr,
    message_bytes: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(server))
        .await
        .map_err(|_| transport_error(server, "timeout connecting"))?
        .map_err(|e| transport_error(server, format!("connect failed: {}", e)))?;

    stream
        .set_nodelay(true)
        .map_err(|e| transport_error(server, format!("TCP_NODELAY: {}", e)))?;

    tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
        .await
        .map_err(|_| transport_error(server, "timeout sending TCP query"))?
        .map_err(|e| transport_error(server, format!("send failed: {}", e)))?;

    debug!(server = %server, message_len = message_bytes.len(), "TCP query sent");

    let response = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
        .await
        .map_err(|_| transport_error(server, "timeout waiting for TCP response"))?
        .map_err(|e| transport_error(server, format!("receive failed: {}", e)))?;

    debug!(server = %server, response_len = response.len(), "TCP response received");

    Ok(response)
}

pub async fn send_with_length_prefix<S>(stream: &mut S, message_bytes: &[u8]) -> io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("message too large: {} bytes", message_bytes.len()),
        )
    })?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

pub async fn read_with_length_prefix<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let message_len = u16::from_be_bytes(len_buf) as usize;
    let mut message = vec![0u8; message_len];
    stream.read_exact(&mut message).await?;

    Ok(message)
}
