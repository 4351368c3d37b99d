#![deny(unsafe_code)]

//! fipctl core — floating-IP resource client.
//!
//! Talks to a fipd control plane over its Unix domain socket using
//! HTTP/1.1 semantics. The [`transport`] layer performs one raw
//! request/response exchange; the [`fip`] layer builds requests,
//! interprets status codes, and decodes resource payloads. Every failure
//! is returned to the caller as a typed error — nothing in this crate
//! logs-and-exits or talks to stdout.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future — the standard return type for async
/// trait methods that require dynamic dispatch (`dyn Trait`).
///
/// Native `async fn` in traits produces opaque return types that are not
/// object-safe. Traits consumed via `Box<dyn Trait>` or `&dyn Trait` must
/// return a concrete `Pin<Box<dyn Future>>` instead. This alias keeps those
/// signatures readable.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error taxonomy for transport and FIP operations.
pub mod error;
/// Floating-IP operations and wire types.
pub mod fip;
/// Single-exchange transport over the control-plane socket.
pub mod transport;

pub use error::{FipError, TransportError};
pub use fip::{FipClient, FipResource};
pub use transport::{Exchange, Transport, UnixTransport};
