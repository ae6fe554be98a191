use indns_domain::NetworkKind;
use indns_infrastructure::dns::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use indns_infrastructure::dns::transport::udp::MAX_UDP_RESPONSE_SIZE;
use indns_infrastructure::dns::DnsRequestHandler;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Serves UDP and TCP on `bind_addr` until `shutdown` fires.
pub async fn start_dns_server(
    bind_addr: SocketAddr,
    handler: Arc<DnsRequestHandler>,
    tcp_idle_timeout: Duration,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let udp_socket = Arc::new(UdpSocket::bind(bind_addr).await?);
    let tcp_listener = TcpListener::bind(bind_addr).await?;

    info!(bind_address = %bind_addr, "DNS server ready (udp, tcp)");

    let udp = tokio::spawn(run_udp(udp_socket, handler.clone(), shutdown.clone()));
    let tcp = tokio::spawn(run_tcp(tcp_listener, handler, tcp_idle_timeout, shutdown));

    let (udp_result, tcp_result) = tokio::join!(udp, tcp);
    if let Err(e) = udp_result {
        error!(error = %e, "UDP listener task failed");
    }
    if let Err(e) = tcp_result {
        error!(error = %e, "TCP listener task failed");
    }
    Ok(())
}

async fn run_udp(socket: Arc<UdpSocket>, handler: Arc<DnsRequestHandler>, shutdown: CancellationToken) {
    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("UDP listener: shutting down");
                break;
            }
            received = socket.recv_from(&mut recv_buf) => {
                let (len, from) = match received {
                    Ok(r) => r,
                    Err(e) => {
                        debug!(error = %e, "UDP receive failed");
                        continue;
                    }
                };

                let query: Arc<[u8]> = Arc::from(&recv_buf[..len]);
                let handler = handler.clone();
                let socket = socket.clone();
                tokio::spawn(async move {
                    if let Some(response) = handler.handle_wire(&query, NetworkKind::Udp).await {
                        if let Err(e) = socket.send_to(&response, from).await {
                            debug!(client = %from, error = %e, "Failed to send UDP response");
                        }
                    }
                });
            }
        }
    }
}

async fn run_tcp(
    listener: TcpListener,
    handler: Arc<DnsRequestHandler>,
    idle_timeout: Duration,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("TCP listener: shutting down");
                break;
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(a) => a,
                    Err(e) => {
                        debug!(error = %e, "TCP accept failed");
                        continue;
                    }
                };
                let handler = handler.clone();
                tokio::spawn(async move {
                    if let Err(e) = serve_tcp_connection(stream, &handler, idle_timeout).await {
                        debug!(client = %peer, error = %e, "TCP connection closed with error");
                    }
                });
            }
        }
    }
}

/// Answers length-prefixed queries until the peer closes or goes idle.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    handler: &DnsRequestHandler,
    idle_timeout: Duration,
) -> io::Result<()> {
    loop {
        let query = match tokio::time::timeout(idle_timeout, read_with_length_prefix(&mut stream)).await {
            Ok(Ok(query)) => query,
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Ok(Err(e)) => return Err(e),
            Err(_) => return Ok(()),
        };

        match handler.handle_wire(&query, NetworkKind::Tcp).await {
            Some(response) => send_with_length_prefix(&mut stream, &response).await?,
            None => return Ok(()),
        }
    }
}
