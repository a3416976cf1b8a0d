//! I/O utilities for in-memory TIFF buffers
//!
//! This module provides the reader trait and the byte order strategies
//! shared by the TIFF reader and writer.

pub mod seekable;
pub mod byte_order;
