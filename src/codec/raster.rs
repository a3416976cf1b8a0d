//! Pixel-level codec backed by the `tiff` crate
//!
//! Frames are decoded to `image::DynamicImage` and written back with
//! `tiff::encoder::TiffEncoder`. The backend is deliberately narrower than
//! the container backend: it refuses layouts the decoder cannot represent
//! faithfully, and it has no encoder path for some layouts it can decode.

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer};
use log::debug;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, compression::DeflateLevel, Compression, TiffEncoder};
use tiff::{ColorType, TiffError as DecoderError, TiffUnsupportedError};

use crate::codec::{CodecError, DecodeFailure, Frame, FrameEncoder, TiffCodec};
use crate::compression::{CompressionKind, CompressionPolicy};
use crate::model::Document;
use crate::tiff::PageInfo;

/// Pixels of one decoded frame
#[derive(Debug, Clone)]
pub enum RasterPixels {
    /// Pixel layout with an encoder path
    Image(DynamicImage),
    /// Pixel layout the backend decodes but cannot write back
    Unencodable(String),
}

/// One page decoded to pixels
#[derive(Debug, Clone)]
pub struct RasterFrame {
    info: PageInfo,
    pixels: RasterPixels,
}

impl RasterFrame {
    /// The decoded image, when the layout has an encoder path
    pub fn image(&self) -> Option<&DynamicImage> {
        match &self.pixels {
            RasterPixels::Image(image) => Some(image),
            RasterPixels::Unencodable(_) => None,
        }
    }

    /// Decoded pixels
    pub fn pixels(&self) -> &RasterPixels {
        &self.pixels
    }
}

impl Frame for RasterFrame {
    fn info(&self) -> &PageInfo {
        &self.info
    }
}

/// Raster backend
#[derive(Debug, Clone, Default)]
pub struct RasterCodec;

impl RasterCodec {
    pub fn new() -> Self {
        RasterCodec
    }

    /// Rejects documents the decoder cannot represent faithfully
    fn check_pages(infos: &[PageInfo]) -> Result<(), CodecError> {
        let first = infos
            .first()
            .ok_or_else(|| CodecError::decode(DecodeFailure::InvalidContainer, "no pages found"))?;

        for (index, info) in infos.iter().enumerate() {
            if info.is_cmyk() {
                return Err(CodecError::decode(
                    DecodeFailure::UnsupportedColorType,
                    format!("page {} is CMYK with {} bits per sample", index, info.max_bits_per_sample()),
                ));
            }
            if matches!(info.compression, CompressionKind::LegacyJpeg | CompressionKind::ThunderScan) {
                return Err(CodecError::decode(
                    DecodeFailure::UnsupportedCompression,
                    format!("page {} uses {} compression", index, info.compression),
                ));
            }
            if !info.has_standard_sample_format() {
                return Err(CodecError::decode(
                    DecodeFailure::UnsupportedSampleFormat,
                    format!("page {} has sample format {:?}", index, info.sample_format),
                ));
            }
            if info.dimensions() != first.dimensions() {
                return Err(CodecError::decode(
                    DecodeFailure::MismatchedPageSizes,
                    format!(
                        "page {} is {}x{} but page 0 is {}x{}",
                        index, info.width, info.height, first.width, first.height
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl TiffCodec for RasterCodec {
    type Frame = RasterFrame;
    type Encoder = RasterEncoder;

    fn label(&self) -> &str {
        "Raster"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document<RasterFrame>, CodecError> {
        let infos = PageInfo::probe_all(bytes).map_err(CodecError::invalid_container)?;
        Self::check_pages(&infos)?;

        let mut decoder = Decoder::new(Cursor::new(bytes))
            .map_err(|e| map_decoder_error(e, DecodeFailure::InvalidContainer))?;

        let mut document = Document::new();
        for (index, info) in infos.into_iter().enumerate() {
            if index > 0 {
                decoder
                    .next_image()
                    .map_err(|e| map_decoder_error(e, DecodeFailure::InvalidContainer))?;
            }
            let pixels = read_pixels(&mut decoder)?;
            if let RasterPixels::Unencodable(reason) = &pixels {
                debug!("Page {} decoded without an encoder path: {}", index, reason);
            }
            document.push(RasterFrame { info, pixels });
        }

        if decoder.more_images() {
            return Err(CodecError::decode(
                DecodeFailure::InvalidContainer,
                format!("decoder reports more than the {} pages of the IFD chain", document.len()),
            ));
        }
        Ok(document)
    }

    fn encoder(&self, policy: CompressionPolicy) -> Result<RasterEncoder, CodecError> {
        Ok(RasterEncoder {
            policy,
            frames: Vec::new(),
        })
    }

    fn merge_policy(&self) -> CompressionPolicy {
        CompressionPolicy::Force(CompressionKind::Lzw)
    }

    fn legacy_jpeg_fallback(&self) -> CompressionPolicy {
        CompressionPolicy::Force(CompressionKind::Uncompressed)
    }
}

/// Reads the current image of the decoder into pixels
fn read_pixels<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Result<RasterPixels, CodecError> {
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| map_decoder_error(e, DecodeFailure::InvalidContainer))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| map_decoder_error(e, DecodeFailure::UnsupportedColorType))?;
    let data = decoder
        .read_image()
        .map_err(|e| map_decoder_error(e, DecodeFailure::CorruptData))?;

    let image = match (data, color_type) {
        (DecodingResult::U8(data), ColorType::Gray(8)) => {
            ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageLuma8)
        }
        (DecodingResult::U16(data), ColorType::Gray(16)) => {
            ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageLuma16)
        }
        (DecodingResult::U8(data), ColorType::RGB(8)) => {
            ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
        }
        (DecodingResult::U16(data), ColorType::RGB(16)) => {
            ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgb16)
        }
        (DecodingResult::F32(data), ColorType::RGB(32)) => {
            ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgb32F)
        }
        (DecodingResult::U8(data), ColorType::RGBA(8)) => {
            ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgba8)
        }
        (DecodingResult::U16(data), ColorType::RGBA(16)) => {
            ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgba16)
        }
        (DecodingResult::F32(data), ColorType::RGBA(32)) => {
            ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgba32F)
        }
        (_, other) => return Ok(RasterPixels::Unencodable(format!("{:?}", other))),
    };

    image.map(RasterPixels::Image).ok_or_else(|| {
        CodecError::decode(
            DecodeFailure::CorruptData,
            format!("decoded buffer does not match {}x{} {:?}", width, height, color_type),
        )
    })
}

/// Maps a `tiff` crate error into the failure taxonomy
///
/// `format_failure` is used for malformed data, which means a broken
/// container while walking directories and damaged pixels while decoding.
fn map_decoder_error(error: DecoderError, format_failure: DecodeFailure) -> CodecError {
    let failure = match &error {
        DecoderError::UnsupportedError(unsupported) => match unsupported {
            TiffUnsupportedError::UnsupportedCompressionMethod(..)
            | TiffUnsupportedError::UnknownCompressionMethod => DecodeFailure::UnsupportedCompression,
            TiffUnsupportedError::UnsupportedSampleFormat(..) => DecodeFailure::UnsupportedSampleFormat,
            TiffUnsupportedError::UnsupportedBitsPerChannel(..)
            | TiffUnsupportedError::UnsupportedSampleDepth(..)
            | TiffUnsupportedError::InconsistentBitsPerSample(..)
            | TiffUnsupportedError::InterpretationWithBits(..) => DecodeFailure::UnsupportedBitDepth,
            _ => DecodeFailure::UnsupportedColorType,
        },
        DecoderError::FormatError(_) | DecoderError::IoError(_) => format_failure,
        _ => DecodeFailure::CorruptData,
    };
    CodecError::decode(failure, error.to_string())
}

/// Encoder compression for a page kind, when the `tiff` encoder has one
fn encoder_compression(kind: CompressionKind) -> Option<Compression> {
    match kind {
        CompressionKind::Uncompressed => Some(Compression::Uncompressed),
        CompressionKind::Lzw => Some(Compression::Lzw),
        CompressionKind::Deflate => Some(Compression::Deflate(DeflateLevel::Balanced)),
        CompressionKind::PackBits => Some(Compression::Packbits),
        _ => None,
    }
}

/// Encoding session of the raster backend
pub struct RasterEncoder {
    policy: CompressionPolicy,
    frames: Vec<(DynamicImage, CompressionKind)>,
}

impl FrameEncoder for RasterEncoder {
    type Frame = RasterFrame;

    fn append(&mut self, frame: RasterFrame) -> Result<(), CodecError> {
        let image = match frame.pixels {
            RasterPixels::Image(image) => image,
            RasterPixels::Unencodable(layout) => {
                return Err(CodecError::UnsupportedOperation(format!(
                    "raster backend cannot encode {} pixels", layout
                )));
            }
        };

        let kind = self.policy.forced_kind().unwrap_or(frame.info.compression);
        if encoder_compression(kind).is_none() {
            return Err(CodecError::UnsupportedOperation(format!(
                "raster backend cannot encode {} compression", kind
            )));
        }

        if let Some((first, _)) = self.frames.first() {
            if (first.width(), first.height()) != (image.width(), image.height()) {
                return Err(CodecError::Encode(format!(
                    "frame is {}x{} but the document is {}x{}",
                    image.width(), image.height(), first.width(), first.height()
                )));
            }
        }

        self.frames.push((image, kind));
        Ok(())
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn finish(self) -> Result<Vec<u8>, CodecError> {
        if self.frames.is_empty() {
            return Err(CodecError::Encode("no pages were appended".to_string()));
        }

        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| CodecError::Encode(e.to_string()))?;

        for (index, (image, kind)) in self.frames.iter().enumerate() {
            let compression = encoder_compression(*kind).ok_or_else(|| {
                CodecError::UnsupportedOperation(format!("raster backend cannot encode {} compression", kind))
            })?;
            encoder = encoder.with_compression(compression);
            debug!("Writing raster page {} with {}", index, kind);
            write_frame(&mut encoder, image)?;
        }
        drop(encoder);

        Ok(buffer)
    }
}

/// Writes one image as the next IFD
fn write_frame<W: std::io::Write + std::io::Seek>(
    encoder: &mut TiffEncoder<W>,
    image: &DynamicImage,
) -> Result<(), CodecError> {
    let (width, height) = (image.width(), image.height());
    let result = match image {
        DynamicImage::ImageLuma8(buf) => encoder.write_image::<colortype::Gray8>(width, height, buf.as_raw()),
        DynamicImage::ImageLuma16(buf) => encoder.write_image::<colortype::Gray16>(width, height, buf.as_raw()),
        DynamicImage::ImageRgb8(buf) => encoder.write_image::<colortype::RGB8>(width, height, buf.as_raw()),
        DynamicImage::ImageRgb16(buf) => encoder.write_image::<colortype::RGB16>(width, height, buf.as_raw()),
        DynamicImage::ImageRgba8(buf) => encoder.write_image::<colortype::RGBA8>(width, height, buf.as_raw()),
        DynamicImage::ImageRgba16(buf) => encoder.write_image::<colortype::RGBA16>(width, height, buf.as_raw()),
        DynamicImage::ImageRgb32F(buf) => encoder.write_image::<colortype::RGB32Float>(width, height, buf.as_raw()),
        DynamicImage::ImageRgba32F(buf) => encoder.write_image::<colortype::RGBA32Float>(width, height, buf.as_raw()),
        other => {
            return Err(CodecError::UnsupportedOperation(format!(
                "raster backend cannot encode {:?} pixels", other.color()
            )));
        }
    };
    result.map_err(|e| CodecError::Encode(e.to_string()))
}
