use std::net::SocketAddr;

use tokio::net::UdpSocket;

use crate::config::AppConfig;
use crate::errors::IngestError;
use crate::persistence::{self, Store};
use crate::services::form_service;

/// The store writer: a single-task datagram receive loop.
///
/// One datagram is fully processed, including the store file
/// read-modify-write, before the next receive. There is no queue;
/// datagrams arriving in between sit in the OS socket buffer and are
/// silently dropped once it overflows.
pub struct IngestServer {
    socket: UdpSocket,
    store: Store,
    buffer_size: usize,
}

impl IngestServer {
    /// Bind the receive socket. Must complete before the HTTP side
    /// accepts its first POST, or early datagrams are lost.
    pub async fn bind(cfg: &AppConfig, store: Store) -> std::io::Result<Self> {
        let socket = UdpSocket::bind((cfg.socket_host.as_str(), cfg.socket_port)).await?;
        Ok(Self {
            socket,
            store,
            buffer_size: cfg.buffer_size,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receive loop. Runs until CTRL+C; a failed datagram is logged
    /// and dropped, never fatal.
    pub async fn run(self) {
        match self.local_addr() {
            Ok(addr) => tracing::info!("Socket server listening on {}", addr),
            Err(_) => tracing::info!("Socket server listening"),
        }

        let mut buf = vec![0u8; self.buffer_size];
        loop {
            tokio::select! {
                received = self.socket.recv_from(&mut buf) => {
                    match received {
                        Ok((len, peer)) => self.handle_datagram(&buf[..len], peer),
                        Err(e) => tracing::error!("Datagram receive failed: {}", e),
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("CTRL+C received, socket server stopping");
                    break;
                }
            }
        }
    }

    fn handle_datagram(&self, data: &[u8], peer: SocketAddr) {
        match self.process(data) {
            Ok(count) => {
                tracing::info!("Stored submission from {} ({} total)", peer, count);
            }
            Err(e) => {
                tracing::error!("Dropped datagram from {}: {}", peer, e);
            }
        }
    }

    /// Decode, timestamp, merge.
    fn process(&self, data: &[u8]) -> Result<usize, IngestError> {
        let record = form_service::parse_form(data)?;
        let timestamp = persistence::timestamp_key();
        self.store.append(&timestamp, record)
    }
}
