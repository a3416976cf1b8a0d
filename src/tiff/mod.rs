//! TIFF structure module
//!
//! This module provides structures and functions for reading and writing
//! TIFF and BigTIFF directory chains in memory.

pub mod errors;
pub mod ifd;
pub(crate) mod types;
pub mod reader;
pub mod writer;
pub mod page_info;
mod tests;
pub mod constants;
pub(crate) mod validation;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use page_info::PageInfo;
pub use reader::TiffReader;
pub use types::TIFF;
pub use writer::{BlockGroup, TiffWriter};
