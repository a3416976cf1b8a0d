//! Parsed TIFF structure

use std::fmt;

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::tags;
use crate::tiff::ifd::IFD;

/// A TIFF buffer as a chain of directories, one per page
#[derive(Debug, Clone)]
pub struct TIFF {
    /// Directories in chain order
    pub ifds: Vec<IFD>,
    pub is_big_tiff: bool,
    pub byte_order: ByteOrder,
}

impl TIFF {
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TIFF {
            ifds: Vec::new(),
            is_big_tiff,
            byte_order,
        }
    }

    /// The directory of the first page
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.first()
    }

    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }

    pub fn is_multi_page(&self) -> bool {
        self.ifds.len() > 1
    }

    /// Directories whose NewSubfileType marks a reduced resolution image
    pub fn overviews(&self) -> Vec<&IFD> {
        self.ifds
            .iter()
            .filter(|ifd| ifd.tag_value(tags::NEW_SUBFILE_TYPE).map_or(false, |kind| kind & 1 == 1))
            .collect()
    }
}

impl fmt::Display for TIFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}, {}, {} page(s)",
            if self.is_big_tiff { "BigTIFF" } else { "TIFF" },
            self.byte_order.name(),
            self.ifds.len()
        )?;
        for (index, ifd) in self.ifds.iter().enumerate() {
            writeln!(f, "Page {}:", index + 1)?;
            write!(f, "{}", ifd)?;
        }
        Ok(())
    }
}
