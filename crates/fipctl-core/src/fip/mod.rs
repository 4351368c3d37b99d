//! Floating-IP resources — allocation, naming, and release.
//!
//! A floating IP exists on the control plane from the moment an
//! allocation succeeds until it is released; the client caches nothing
//! and every call reflects the server's state at call time.

pub mod client;
pub mod types;

pub use client::FipClient;
pub use types::{FipResource, NameRequest};
