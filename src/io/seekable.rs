//! Random access over page buffers
//!
//! Pages are held in memory, so the reader is normally a `Cursor<&[u8]>`.
//! The TIFF reader only depends on this trait.

use std::io::{self, Read, Seek, SeekFrom};

pub trait SeekableReader: Read + Seek + Send + Sync {
    /// Total length of the underlying buffer; the read position is kept
    fn byte_len(&mut self) -> io::Result<u64> {
        let position = self.stream_position()?;
        let len = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(position))?;
        Ok(len)
    }
}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
