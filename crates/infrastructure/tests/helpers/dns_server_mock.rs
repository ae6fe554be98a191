#![allow(dead_code)]
use super::mock_exchange::answer_for;
use hickory_proto::op::Message;
use indns_infrastructure::dns::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// UDP upstream answering every decodable query with one fixed `A` record.
pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(answer: Ipv4Addr, ttl: u32) -> std::io::Result<Self> {
        Self::start_with(move |query| answer_for(query, answer, ttl).to_vec().ok()).await
    }

    /// Replies with `respond(query)`; `None` means stay silent.
    pub async fn start_with<F>(respond: F) -> std::io::Result<Self>
    where
        F: Fn(&Message) -> Option<Vec<u8>> + Send + 'static,
    {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let reply = Message::from_vec(&buf[..len]).ok().and_then(|q| respond(&q));
                            if let Some(reply) = reply {
                                let _ = socket.send_to(&reply, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// TCP counterpart of [`MockDnsServer`], one query per connection.
pub struct MockTcpDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockTcpDnsServer {
    pub async fn start(answer: Ipv4Addr, ttl: u32) -> std::io::Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    accepted = listener.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        tokio::spawn(async move {
                            let Ok(bytes) = read_with_length_prefix(&mut stream).await else { return };
                            let Ok(query) = Message::from_vec(&bytes) else { return };
                            if let Ok(reply) = answer_for(&query, answer, ttl).to_vec() {
                                let _ = send_with_length_prefix(&mut stream, &reply).await;
                            }
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for MockTcpDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
