#![cfg(test)]
#![allow(dead_code)]

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Minimal HTTP server answering every request with the same PAC script
pub struct PacServer {
    addr: SocketAddr,
    _server_handle: JoinHandle<()>,
}

impl PacServer {
    pub async fn start(status: u16, body: &'static str) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server_handle = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(Self::handle_connection(socket, status, body));
            }
        });

        Ok(Self {
            addr,
            _server_handle: server_handle,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}/proxy.pac", self.addr)
    }

    async fn handle_connection(mut socket: TcpStream, status: u16, body: &'static str) {
        let mut buffer = vec![0; 4096];
        let mut request = Vec::new();
        loop {
            match socket.read(&mut buffer).await {
                Ok(0) | Err(_) => return,
                Ok(n) => {
                    request.extend_from_slice(&buffer[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
            }
        }

        let reason = if status == 200 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/x-ns-proxy-autoconfig\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }
}
