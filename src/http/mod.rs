//! HTTP protocol layer module
//!
//! Wire-side functionality shared by the server: MIME detection and
//! response materialization. Protocol decisions themselves live in the
//! engine.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{build_404_response, build_405_response, materialize};
