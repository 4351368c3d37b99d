//! Error types for the transport and FIP client layers.
//!
//! Failures are split into four kinds: invalid caller input (caught
//! before any network activity), transport failures (the exchange never
//! completed), unexpected status codes (the exchange completed but the
//! server said something other than the operation's success code), and
//! decode failures (the body did not have the expected shape).

use std::path::PathBuf;

use hyper::StatusCode;

/// Errors from the control-plane socket transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("control plane is not reachable (socket not found at {0})")]
    Unavailable(PathBuf),

    #[error("failed to connect to control-plane socket at {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("exchange failed: {0}")]
    Exchange(String),
}

/// Errors from FIP operations.
#[derive(Debug, thiserror::Error)]
pub enum FipError {
    /// A required argument was empty or out of range. No request was sent.
    #[error("invalid input: {0}")]
    Input(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The exchange completed but returned a status other than the
    /// operation's documented success code. Carries the raw body for
    /// diagnostics.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("failed to parse response: {0}")]
    Decode(String),

    /// A release-all run aborted part way through. `released` holds the
    /// ips released before the failure; those stay released on the server.
    #[error("release-all aborted: {} address(es) released, then failed on {ip}: {source}", .released.len())]
    ReleaseAll {
        released: Vec<String>,
        ip: String,
        source: Box<FipError>,
    },
}
