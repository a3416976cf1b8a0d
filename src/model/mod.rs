//! Page and document model
//!
//! Plain data holders shared by the codecs, the engines and the harness.

mod document;
mod page;

pub use crate::compression::{CompressionKind, CompressionPolicy};
pub use crate::tiff::PageInfo;
pub use document::Document;
pub use page::Page;
