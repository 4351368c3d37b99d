//! FIP client — the six resource operations.
//!
//! Validates inputs before any network call, builds request paths and
//! bodies, interprets status codes per operation, and decodes JSON
//! payloads. Holds no cross-call state: each call is a fresh look at the
//! server, and concurrent sharing is the caller's concern.

use std::path::PathBuf;

use bytes::Bytes;
use hyper::{Method, StatusCode};
use tracing::debug;

use crate::error::FipError;
use crate::transport::{Exchange, Transport, UnixTransport};

use super::types::{FipResource, NameRequest};

/// Collection endpoint for floating IPs.
const FIPS: &str = "/fips";

/// Path for a single address, with the ip percent-encoded as a segment.
fn fip_path(ip: &str) -> String {
    format!("{FIPS}/{}", urlencoding::encode(ip))
}

fn require(value: &str, what: &str) -> Result<(), FipError> {
    if value.is_empty() {
        return Err(FipError::Input(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Reject any status other than the operation's success code, keeping the
/// raw body for diagnostics.
fn expect_status(exchange: Exchange, expected: StatusCode) -> Result<Bytes, FipError> {
    if exchange.status != expected {
        return Err(FipError::UnexpectedStatus {
            status: exchange.status,
            body: String::from_utf8_lossy(&exchange.body).into_owned(),
        });
    }
    Ok(exchange.body)
}

/// Client for floating-IP resources on a control plane.
///
/// Generic over [`Transport`] so tests can drive it with a recording
/// mock; production code uses [`FipClient::connect`] with the
/// [`UnixTransport`].
pub struct FipClient<T: Transport> {
    transport: T,
}

impl FipClient<UnixTransport> {
    /// Client talking to the control plane at the given socket path.
    pub fn connect(socket_path: impl Into<PathBuf>) -> Self {
        Self::new(UnixTransport::new(socket_path))
    }
}

impl<T: Transport> FipClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Allocate `count` new floating IPs.
    ///
    /// `count` must be positive. Returns the newly allocated resources;
    /// the server is authoritative about how many it actually handed out.
    pub async fn allocate(&self, count: u32) -> Result<Vec<FipResource>, FipError> {
        if count == 0 {
            return Err(FipError::Input("count must be positive".to_string()));
        }
        let path = format!("{FIPS}?count={count}");
        let exchange = self.transport.execute(Method::POST, &path, None, None).await?;
        let body = expect_status(exchange, StatusCode::CREATED)?;
        serde_json::from_slice(&body).map_err(|e| FipError::Decode(format!("allocate: {e}")))
    }

    /// List all currently held floating IPs (may be empty).
    pub async fn list(&self) -> Result<Vec<FipResource>, FipError> {
        let exchange = self.transport.execute(Method::GET, FIPS, None, None).await?;
        let body = expect_status(exchange, StatusCode::OK)?;
        serde_json::from_slice(&body).map_err(|e| FipError::Decode(format!("list: {e}")))
    }

    /// Fetch a single floating IP by address.
    pub async fn get(&self, ip: &str) -> Result<FipResource, FipError> {
        require(ip, "ip")?;
        let path = fip_path(ip);
        let exchange = self.transport.execute(Method::GET, &path, None, None).await?;
        let body = expect_status(exchange, StatusCode::OK)?;
        serde_json::from_slice(&body).map_err(|e| FipError::Decode(format!("get: {e}")))
    }

    /// Attach a human-readable name to a floating IP. A name may be
    /// reassigned any number of times.
    pub async fn name(&self, ip: &str, name: &str) -> Result<(), FipError> {
        require(ip, "ip")?;
        require(name, "name")?;
        let body = serde_json::to_vec(&NameRequest {
            name: name.to_string(),
        })
        .map_err(|e| FipError::Decode(format!("name request: {e}")))?;
        let path = fip_path(ip);
        let exchange = self
            .transport
            .execute(Method::POST, &path, Some(&body), Some("application/json"))
            .await?;
        expect_status(exchange, StatusCode::NO_CONTENT)?;
        Ok(())
    }

    /// Release a single floating IP. Released addresses are gone;
    /// operations against them fail server-side.
    pub async fn release(&self, ip: &str) -> Result<(), FipError> {
        require(ip, "ip")?;
        let path = fip_path(ip);
        let exchange = self
            .transport
            .execute(Method::DELETE, &path, None, None)
            .await?;
        expect_status(exchange, StatusCode::NO_CONTENT)?;
        Ok(())
    }

    /// Release every floating IP the control plane currently lists, one
    /// at a time in list order. Returns the released addresses.
    ///
    /// A list failure propagates untouched and no release is attempted.
    /// A mid-sequence release failure aborts the run;
    /// [`FipError::ReleaseAll`] then reports the addresses released
    /// before the failure (those stay released — there is no rollback).
    pub async fn release_all(&self) -> Result<Vec<String>, FipError> {
        let fips = self.list().await?;
        let mut released = Vec::with_capacity(fips.len());
        for fip in fips {
            if let Err(e) = self.release(&fip.ip).await {
                return Err(FipError::ReleaseAll {
                    released,
                    ip: fip.ip,
                    source: Box::new(e),
                });
            }
            debug!(ip = %fip.ip, "released floating IP");
            released.push(fip.ip);
        }
        Ok(released)
    }
}
