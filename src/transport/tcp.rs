//! Reference host transport: plain HTTP/1.1 over a TCP stream.
//!
//! One complete `HostTransport` binding so the shim can be driven end-to-end
//! without an embedding host. Each started request runs on its own tokio
//! task; `cancel()` aborts the task. This is the host primitive, not a
//! client library: one connection per request (`Connection: close`), no
//! redirects, no retries, no TLS.

use crate::config::Config;
use crate::transport::handle::{HeadersSignal, TransportHandle};
use crate::transport::types::{
    DecodeMode, ResponseBody, TransportOutcome, TransportRequest, TransportSuccess,
};
use crate::transport::{CompletionFn, HostTransport};
use anyhow::{Context, Result};
use bytes::{Buf, BytesMut};
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Default buffer size for the response read loop
const BUFFER_SIZE: usize = 8192;

/// Upper bound on response header bytes before the request is failed
const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Transport that executes requests over plain TCP.
///
/// `start()` must be called from within a tokio runtime: the request's work
/// is spawned onto it.
pub struct TcpTransport {
    connect_timeout: Duration,
}

impl TcpTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.connect_timeout())
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl HostTransport for TcpTransport {
    fn start(&self, request: TransportRequest, on_complete: CompletionFn) -> TransportHandle {
        let signal = HeadersSignal::new();
        let task_signal = signal.clone();
        let connect_timeout = self.connect_timeout;

        let join = tokio::spawn(async move {
            tracing::debug!(
                method = request.method.as_str(),
                url = %request.url,
                "Starting transport request"
            );

            let outcome = match run_request(&request, &task_signal, connect_timeout).await {
                Ok(success) => {
                    tracing::debug!(
                        url = %request.url,
                        status = success.status,
                        "Transport request completed"
                    );
                    TransportOutcome::Success(success)
                }
                Err(e) => {
                    tracing::warn!(url = %request.url, error = %e, "Transport request failed");
                    TransportOutcome::Failure {
                        message: e.to_string(),
                    }
                }
            };

            on_complete(outcome);
        });

        TransportHandle::new(&signal, move || join.abort())
    }
}

async fn run_request(
    request: &TransportRequest,
    signal: &HeadersSignal,
    connect_timeout: Duration,
) -> Result<TransportSuccess> {
    let url = url::Url::parse(&request.url).context("invalid request URL")?;

    if url.scheme() != "http" {
        anyhow::bail!("unsupported scheme: {}", url.scheme());
    }

    let host = url.host_str().context("request URL missing host")?;
    let port = url.port().unwrap_or(80);
    let addr = format!("{}:{}", host, port);

    let mut stream = timeout(connect_timeout, TcpStream::connect(&addr))
        .await
        .context("connect timeout")?
        .context("failed to connect")?;

    tracing::trace!(addr = %addr, "Connected");

    let request_bytes = serialize_request(request, &url);
    stream.write_all(&request_bytes).await?;
    stream.flush().await?;

    read_response(&mut stream, signal, request.decode).await
}

/// Build the HTTP/1.1 request bytes for the wire.
fn serialize_request(request: &TransportRequest, url: &url::Url) -> Vec<u8> {
    let mut buffer = Vec::new();

    let path = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };

    buffer.extend_from_slice(
        format!("{} {} HTTP/1.1\r\n", request.method.as_str(), path).as_bytes(),
    );

    let mut headers = request.headers.clone();

    if let Some(host) = url.host_str() {
        let host_value = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        headers.insert("Host".to_string(), host_value);
    }

    // One connection per request
    headers.insert("Connection".to_string(), "close".to_string());

    if let Some(body) = &request.body {
        headers.insert(
            "Content-Length".to_string(),
            body.as_bytes().len().to_string(),
        );
    }

    for (key, value) in &headers {
        buffer.extend_from_slice(format!("{}: {}\r\n", key, value).as_bytes());
    }

    buffer.extend_from_slice(b"\r\n");

    if let Some(body) = &request.body {
        buffer.extend_from_slice(body.as_bytes());
    }

    buffer
}

/// Read the response, firing the headers-received signal once the head is
/// parsed, then decode the body.
async fn read_response(
    stream: &mut TcpStream,
    signal: &HeadersSignal,
    decode: DecodeMode,
) -> Result<TransportSuccess> {
    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);

    loop {
        if let Some(headers_end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            let head_bytes = buffer.split_to(headers_end + 4);
            let (status, headers) = parse_response_head(&head_bytes)?;

            signal.notify();

            let raw_body = read_body(stream, &mut buffer, &headers).await?;
            let body = decode_body(decode, raw_body)?;

            return Ok(TransportSuccess {
                status,
                headers,
                body,
            });
        }

        // Prevent unbounded header growth
        if buffer.len() > MAX_HEADER_BYTES {
            anyhow::bail!("response headers too large");
        }

        let n = stream.read_buf(&mut buffer).await?;
        if n == 0 {
            anyhow::bail!("connection closed before complete response received");
        }
    }
}

/// Parse the status line and header block.
fn parse_response_head(head: &[u8]) -> Result<(u16, HashMap<String, String>)> {
    let head_str = std::str::from_utf8(head).context("invalid UTF-8 in response headers")?;
    let mut lines = head_str.lines();

    let status_line = lines.next().context("empty response")?;
    let mut parts = status_line.splitn(3, ' ');
    parts.next().context("invalid status line")?;
    let status: u16 = parts
        .next()
        .context("invalid status line")?
        .parse()
        .context("invalid status code")?;

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    Ok((status, headers))
}

/// Read the body by Content-Length, or to EOF when the header is absent.
async fn read_body(
    stream: &mut TcpStream,
    buffer: &mut BytesMut,
    headers: &HashMap<String, String>,
) -> Result<Vec<u8>> {
    let content_length = headers
        .get("Content-Length")
        .and_then(|v| v.parse::<usize>().ok());

    let Some(content_length) = content_length else {
        let mut body = buffer.to_vec();
        buffer.clear();
        loop {
            let n = stream.read_buf(buffer).await?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(buffer);
            buffer.clear();
        }
        return Ok(body);
    };

    let mut body = Vec::with_capacity(content_length);

    // Use whatever arrived with the headers first
    let from_buffer = buffer.len().min(content_length);
    body.extend_from_slice(&buffer[..from_buffer]);
    buffer.advance(from_buffer);

    while body.len() < content_length {
        let n = stream.read_buf(buffer).await?;
        if n == 0 {
            anyhow::bail!("connection closed before complete body received");
        }
        let take = buffer.len().min(content_length - body.len());
        body.extend_from_slice(&buffer[..take]);
        buffer.advance(take);
    }

    Ok(body)
}

fn decode_body(decode: DecodeMode, raw: Vec<u8>) -> Result<ResponseBody> {
    match decode {
        DecodeMode::Binary => Ok(ResponseBody::Bytes(raw)),
        DecodeMode::Json => {
            let value = serde_json::from_slice(&raw).context("response body is not valid JSON")?;
            Ok(ResponseBody::Json(value))
        }
        DecodeMode::Text => Ok(ResponseBody::Text(
            String::from_utf8_lossy(&raw).into_owned(),
        )),
    }
}
