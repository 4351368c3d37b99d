//! Single-exchange transport over the control-plane socket.
//!
//! Performs one HTTP/1.1 request/response round trip per call and hands
//! back the raw status and body. Status codes and body contents are not
//! interpreted here — that is the FIP client's job. There is no
//! connection pooling, retry loop, or timeout at this layer; a caller
//! wanting bounded latency wraps the call in `tokio::time::timeout`.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use hyper::Method;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tracing::debug;

use crate::BoxFuture;
use crate::error::TransportError;

/// Raw result of one request/response exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: StatusCode,
    pub body: Bytes,
}

/// One request/response exchange against the control plane.
///
/// Implementations must be `Send + Sync`. Uses [`BoxFuture`] for object
/// safety so tests can substitute a recording mock.
pub trait Transport: Send + Sync {
    /// Execute a single exchange. The transport reports only whether the
    /// exchange completed; it never judges the status code.
    fn execute<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        body: Option<&'a [u8]>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Exchange, TransportError>>;
}

/// Transport that opens a fresh `UnixStream` for every exchange.
#[derive(Debug, Clone)]
pub struct UnixTransport {
    socket_path: PathBuf,
}

impl UnixTransport {
    /// Create a transport targeting the given socket path.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Check if the control-plane socket exists (the daemon is likely up).
    pub fn available(&self) -> bool {
        self.socket_path.exists()
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
        content_type: Option<&str>,
    ) -> Result<Exchange, TransportError> {
        if !self.available() {
            return Err(TransportError::Unavailable(self.socket_path.clone()));
        }

        let stream =
            UnixStream::connect(&self.socket_path)
                .await
                .map_err(|e| TransportError::Connect {
                    path: self.socket_path.clone(),
                    source: e,
                })?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) =
            hyper::client::conn::http1::handshake::<_, http_body_util::Full<Bytes>>(io)
                .await
                .map_err(|e| TransportError::Exchange(format!("HTTP handshake failed: {e}")))?;

        // Drive the connection in the background
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!(error = %e, "control-plane connection error");
            }
        });

        debug!(%method, path, "control-plane exchange");

        let req_body = match body {
            Some(data) => http_body_util::Full::new(Bytes::copy_from_slice(data)),
            None => http_body_util::Full::new(Bytes::new()),
        };

        let mut builder = hyper::Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }

        let req = builder
            .body(req_body)
            .map_err(|e| TransportError::Exchange(format!("failed to build request: {e}")))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| TransportError::Exchange(format!("request failed: {e}")))?;

        let status = resp.status();

        let resp_body = http_body_util::BodyExt::collect(resp.into_body())
            .await
            .map_err(|e| TransportError::Exchange(format!("failed to read response body: {e}")))?
            .to_bytes();

        Ok(Exchange {
            status,
            body: resp_body,
        })
    }
}

impl Transport for UnixTransport {
    fn execute<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        body: Option<&'a [u8]>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Exchange, TransportError>> {
        Box::pin(self.exchange(method, path, body, content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_reports_missing_socket() {
        let transport = UnixTransport::new("/tmp/nonexistent-fipd.sock");
        assert!(!transport.available());
    }

    #[tokio::test]
    async fn exchange_against_missing_socket_is_unavailable() {
        let transport = UnixTransport::new("/tmp/nonexistent-fipd.sock");
        let result = transport.execute(Method::GET, "/fips", None, None).await;
        assert!(matches!(result, Err(TransportError::Unavailable(_))));
    }

    #[tokio::test]
    async fn exchange_against_non_socket_file_is_connect_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let transport = UnixTransport::new(tmp.path());
        let result = transport.execute(Method::GET, "/fips", None, None).await;
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }
}
