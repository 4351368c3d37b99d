#![deny(unsafe_code)]

//! Shared test utilities for the fipctl workspace.
//!
//! Provides the in-memory mock FIP control plane and tracing helpers so
//! that individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! fipctl-test-utils = { workspace = true }
//! ```

pub mod server;
pub mod tracing_setup;
