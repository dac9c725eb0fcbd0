//! RAW image reader implementation using the rawloader library.
//!
//! Decodes camera RAW files (ARW, CR2, NEF, DNG, ...) into their undemosaiced
//! sensor mosaic, ready for lossless CFA encoding.

use std::io::Cursor;

use tracing::{debug, warn};
use rawloader::RawImageData as RawloaderImageData;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::RawImageData;
use crate::image_pipeline::raw::reader::RawImageReader;

/// RAW image reader that uses the rawloader library for decoding.
pub struct RawLoaderReader;

/// Bit depth assumed when the file carries no usable white level.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

impl RawImageReader for RawLoaderReader {
    /// Decodes a RAW file and returns its Bayer mosaic.
    ///
    /// Integer data is used as-is, float data (normalized 0.0-1.0) is scaled
    /// to the u16 range. The bit depth comes from the largest white level,
    /// e.g. 4095 gives 12 bits and 16383 gives 14 bits.
    ///
    /// Images with more than one component per pixel are already demosaiced
    /// and are rejected.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cfa_lossless_rs::image_pipeline::{RawImageReader, RawLoaderReader};
    ///
    /// let raw_bytes = std::fs::read("image.arw").unwrap();
    /// let image = RawLoaderReader.read_raw(&raw_bytes).unwrap();
    /// println!("{}x{} at {} bits", image.width, image.height, image.bits_per_sample);
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        if decoded.cpp != 1 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} components per pixel, expected a single-plane CFA mosaic",
                decoded.cpp
            )));
        }

        let width = decoded.width;
        let height = decoded.height;
        debug!("Decoded {} {}: {}x{}", decoded.make, decoded.model, width, height);

        let data: Vec<u16> = match decoded.data {
            RawloaderImageData::Integer(values) => values,
            RawloaderImageData::Float(values) => {
                values.iter().map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).collect()
            }
        };

        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if max_white_level == 0 {
            warn!("RAW file reports a zero white level, assuming {} bits", DEFAULT_BITS_PER_SAMPLE);
            DEFAULT_BITS_PER_SAMPLE
        } else {
            u16::BITS - max_white_level.leading_zeros()
        };

        debug!("Calculated bits_per_sample: {} (max white level: {})", bits_per_sample, max_white_level);

        Ok(RawImageData {
            width,
            height,
            data,
            bits_per_sample,
        })
    }
}
