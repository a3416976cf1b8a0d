//! Page metadata probing
//!
//! `PageInfo` is the summary of one IFD that the engines and the harness
//! reason about: size, compression and pixel layout. It is read straight
//! from the directory without touching pixel data.

use std::fmt;

use crate::compression::CompressionKind;
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{photometric, planar_config, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::tag_utils;

/// Metadata derived from one page's IFD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub width: u32,
    pub height: u32,
    pub compression: CompressionKind,
    /// One value per sample
    pub bits_per_sample: Vec<u16>,
    pub samples_per_pixel: u16,
    pub photometric: Option<u16>,
    /// One value per sample
    pub sample_format: Vec<u16>,
    pub planar_configuration: u16,
    pub byte_order: ByteOrder,
}

impl PageInfo {
    /// Derives page metadata from an IFD
    pub fn from_ifd(ifd: &IFD) -> TiffResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;
        let samples_per_pixel = ifd.get_samples_per_pixel().max(1) as u16;

        let compression = CompressionKind::from_tag(
            ifd.tag_value(tags::COMPRESSION).unwrap_or(1) as u16,
        );

        Ok(PageInfo {
            width: width as u32,
            height: height as u32,
            compression,
            bits_per_sample: per_sample(ifd, tags::BITS_PER_SAMPLE, samples_per_pixel, 1),
            samples_per_pixel,
            photometric: ifd.tag_value(tags::PHOTOMETRIC_INTERPRETATION).map(|v| v as u16),
            sample_format: per_sample(ifd, tags::SAMPLE_FORMAT, samples_per_pixel, sample_format::UNSIGNED),
            planar_configuration: ifd
                .tag_value(tags::PLANAR_CONFIGURATION)
                .map(|v| v as u16)
                .unwrap_or(planar_config::CHUNKY),
            byte_order: ifd.byte_order,
        })
    }

    /// Probes every page of a TIFF buffer
    pub fn probe_all(bytes: &[u8]) -> TiffResult<Vec<PageInfo>> {
        let tiff = TiffReader::new().read_bytes(bytes)?;
        tiff.ifds.iter().map(PageInfo::from_ifd).collect()
    }

    /// Total bits per pixel across all samples
    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_sample.iter().map(|&b| b as u32).sum()
    }

    /// Widest sample in bits
    pub fn max_bits_per_sample(&self) -> u16 {
        self.bits_per_sample.iter().copied().max().unwrap_or(1)
    }

    /// Page size as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the page is separated CMYK
    pub fn is_cmyk(&self) -> bool {
        self.photometric == Some(photometric::CMYK)
    }

    /// Whether every sample is an unsigned integer or an IEEE float
    pub fn has_standard_sample_format(&self) -> bool {
        self.sample_format
            .iter()
            .all(|&f| f == sample_format::UNSIGNED || f == sample_format::IEEEFP)
    }
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let photometric = self
            .photometric
            .map(|p| tag_utils::get_photometric_name(p as u64))
            .unwrap_or("Unspecified");
        let formats: Vec<&str> = self
            .sample_format
            .iter()
            .map(|&s| tag_utils::get_sample_format_name(s as u64))
            .collect();

        write!(
            f,
            "{}x{}, {}, {} bpp ({} samples), {}, {}",
            self.width,
            self.height,
            self.compression,
            self.bits_per_pixel(),
            self.samples_per_pixel,
            photometric,
            formats.join("/")
        )
    }
}

/// Reads a per-sample SHORT tag, repeating a single value for every sample
fn per_sample(ifd: &IFD, tag: u16, samples: u16, default: u16) -> Vec<u16> {
    let values = ifd.tag_values(tag).unwrap_or_default();
    match values.len() {
        0 => vec![default; samples as usize],
        1 => vec![values[0] as u16; samples as usize],
        _ => values.into_iter().map(|v| v as u16).collect(),
    }
}
