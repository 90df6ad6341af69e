//! SOCKS5 transport for the proxy probe
//!
//! Dials the candidate, negotiates an unauthenticated SOCKS5 tunnel to the
//! validation target and issues one HTTP/1.1 GET through it.

use std::net::SocketAddr;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::header::{CONNECTION, HOST, USER_AGENT};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio_socks::tcp::Socks5Stream;
use tracing::debug;

use crate::checker::probe::ProxyProbe;
use crate::error::{CheckError, Result};
use crate::models::{ParsedEndpoint, ProbeTarget};

const PROBE_USER_AGENT: &str = concat!("sockscheck/", env!("CARGO_PKG_VERSION"));

/// Probes candidates as unauthenticated SOCKS5 proxies
pub struct Socks5Probe {
    target: ProbeTarget,
}

impl Socks5Probe {
    pub fn new(target: ProbeTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &ProbeTarget {
        &self.target
    }
}

#[async_trait]
impl ProxyProbe for Socks5Probe {
    async fn fetch(&self, endpoint: &ParsedEndpoint) -> Result<StatusCode> {
        let stream = connect_socks5(
            endpoint.socket_addr(),
            self.target.host(),
            self.target.port(),
        )
        .await?;

        debug!(
            "SOCKS5 tunnel through {} to {}:{} established",
            endpoint,
            self.target.host(),
            self.target.port()
        );

        http_get(stream, &self.target).await
    }

    fn protocol_name(&self) -> &'static str {
        "SOCKS5"
    }
}

/// Open a SOCKS5 tunnel through `proxy_addr` to `target_host:target_port`
pub async fn connect_socks5(
    proxy_addr: SocketAddr,
    target_host: &str,
    target_port: u16,
) -> Result<TcpStream> {
    let socket = TcpStream::connect(proxy_addr)
        .await
        .map_err(|e| CheckError::ProxyConnectionFailed(format!("TCP connect failed: {}", e)))?;

    let stream = dial_socks5(socket, target_host, target_port)
        .await
        .map_err(|e| CheckError::Socks5Handshake(e.to_string()))?;

    Ok(stream)
}

async fn dial_socks5(
    socket: TcpStream,
    target_host: &str,
    target_port: u16,
) -> std::result::Result<TcpStream, anyhow::Error> {
    let stream = Socks5Stream::connect_with_socket(socket, (target_host, target_port)).await?;
    Ok(stream.into_inner())
}

/// Send one GET for the target over an established tunnel and drain the body
pub async fn http_get(stream: TcpStream, target: &ProbeTarget) -> Result<StatusCode> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(target.path_and_query())
        .header(HOST, target.authority())
        .header(USER_AGENT, PROBE_USER_AGENT)
        .header(CONNECTION, "close")
        .body(Empty::<Bytes>::new())
        .map_err(|e| CheckError::Http(format!("Failed to build request: {}", e)))?;

    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|e| CheckError::Http(format!("Handshake failed: {}", e)))?;

    let exchange = async move {
        let response = sender
            .send_request(request)
            .await
            .map_err(|e| CheckError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        response
            .into_body()
            .collect()
            .await
            .map_err(|e| CheckError::Http(format!("Failed to read response: {}", e)))?;

        Ok::<_, CheckError>(status)
    };

    // Drive the connection in this task so a timeout drops it together with the request.
    tokio::pin!(exchange);
    tokio::pin!(conn);

    tokio::select! {
        biased;
        result = &mut exchange => result,
        conn_result = &mut conn => {
            conn_result.map_err(|e| CheckError::Http(format!("Connection failed: {}", e)))?;
            exchange.await
        }
    }
}
