pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod model;
pub mod codec;
pub mod engine;
pub mod capability;
pub mod harness;
pub mod artifact;
pub mod commands;

pub use tiff::TiffReader;
pub use model::{CompressionKind, CompressionPolicy, Document, Page, PageInfo};
pub use codec::{CodecError, ContainerCodec, DecodeFailure, RasterCodec, TiffCodec, ToolsCodec};
pub use engine::{Merger, Splitter, TiffMerge, TiffSplit};
pub use harness::{Harness, RunReport, Suites};
