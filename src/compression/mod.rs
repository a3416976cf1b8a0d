//! Block compression and encoder policies
//!
//! Handlers move strip and tile data between the compression kinds the
//! container backend can transcode. `CompressionPolicy` is what callers
//! request from any backend's encoder.

mod factory;
mod handler;
mod handlers;
mod kind;

pub use factory::CompressionFactory;
pub use handler::CompressionHandler;
pub use handlers::{DeflateHandler, UncompressedHandler, ZstdHandler};
pub use kind::{CompressionKind, CompressionPolicy};
