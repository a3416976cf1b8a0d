//! Split and merge engines
//!
//! Both engines are generic over a `TiffCodec`; the backend is picked by
//! constructing the engine with it.

pub mod merge;
pub mod split;

pub use merge::{MergeAccumulator, MergeOutput, Merger, SkippedPage, TiffMerge};
pub use split::{Splitter, TiffSplit};

use crate::codec::CodecError;

/// Wraps an error as an encode failure unless the harness must see it as is
pub(crate) fn escalate_to_encode(context: &str, error: CodecError) -> CodecError {
    if error.kind().is_inconclusive() {
        return error;
    }
    CodecError::Encode(format!("{}: {}", context, error))
}
