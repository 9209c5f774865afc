//! Static file server with rule-based HTTP header injection
//!
//! The crate splits into a protocol core and host glue:
//! - [`engine`] resolves request paths against a document root, computes
//!   rule-injected headers, and honors conditional (If-Modified-Since) and
//!   byte-range semantics, producing a response descriptor.
//! - [`http`] and [`server`] materialize descriptors into hyper responses
//!   and run the HTTP/1.1 connection loop.
//!
//! Embedding hosts can use [`engine::StaticEngine`] directly: a `None`
//! from `try_serve` means the request is not handled here and should fall
//! through to the host's own routing.

pub mod config;
pub mod engine;
pub mod http;
pub mod logger;
pub mod server;
