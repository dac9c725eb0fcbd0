use std::io::Write;
use tracing::{debug, warn};
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::RawImageData;
use crate::image_pipeline::lossless::encoder::{EncodeSummary, LosslessEncoder};
use crate::image_pipeline::lossless::types::{EncoderConfig, Geometry};
use crate::image_pipeline::lossless::writer::LosslessWriter;

/// Writes a Bayer mosaic as a single lossless JPEG frame.
pub struct LjpegWriter;

impl LosslessWriter for LjpegWriter {
    fn write_lossless(&self, image: &RawImageData, output: &mut dyn Write, config: &EncoderConfig) -> Result<EncodeSummary> {
        let bit_depth = config.bit_depth.unwrap_or(image.bits_per_sample);
        if !(1..=16).contains(&bit_depth) {
            return Err(ConversionError::UnsupportedFormat(format!("bit depth {}", bit_depth)));
        }
        if let Some(bits) = config.bit_depth.filter(|&b| b < image.bits_per_sample) {
            warn!(
                requested = bits,
                reported = image.bits_per_sample,
                "Bit depth override is below the sensor bit depth"
            );
        }

        let geometry = Geometry::for_image(image.width, image.height, bit_depth);

        debug!(
            "Encoding lossless JPEG: {}x{} -> {}x{} working raster, {} bits",
            image.width, image.height, geometry.out_cols, geometry.out_rows, bit_depth
        );

        let summary = LosslessEncoder::from_config(config).encode(&image.data, &geometry, output)?;

        debug!("Lossless JPEG encoding complete, {} bytes", summary.total_bytes);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: usize, height: usize, bits_per_sample: u32) -> RawImageData {
        RawImageData {
            width,
            height,
            data: (0..width * height).map(|i| (i % 4000) as u16).collect(),
            bits_per_sample,
        }
    }

    #[test]
    fn test_pads_odd_dimensions() {
        let mut out = Vec::new();
        let summary = LjpegWriter
            .write_lossless(&image(7, 5, 12), &mut out, &EncoderConfig::default())
            .unwrap();
        assert_eq!(summary.geometry.out_cols, 8);
        assert_eq!(summary.geometry.out_rows, 6);
        assert_eq!(summary.residual_count(), 48);
    }

    #[test]
    fn test_bit_depth_override() {
        let mut out = Vec::new();
        let config = EncoderConfig::builder().bit_depth(Some(14)).build();
        let summary = LjpegWriter.write_lossless(&image(4, 4, 12), &mut out, &config).unwrap();
        assert_eq!(summary.geometry.bit_depth, 14);
        assert_eq!(out[6], 14);
    }

    #[test]
    fn test_rejects_invalid_bit_depth() {
        let mut out = Vec::new();
        let config = EncoderConfig::builder().bit_depth(Some(17)).build();
        let result = LjpegWriter.write_lossless(&image(4, 4, 12), &mut out, &config);
        assert!(matches!(result, Err(ConversionError::UnsupportedFormat(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_column_image_without_validation() {
        let mut out = Vec::new();
        let config = EncoderConfig::builder().validate_dimensions(false).build();
        let summary = LjpegWriter.write_lossless(&image(1, 4, 12), &mut out, &config).unwrap();
        assert_eq!(summary.geometry.out_cols, 2);
        assert_eq!(summary.residual_count(), 8);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let mut short = image(4, 4, 12);
        short.data.truncate(10);
        let mut out = Vec::new();
        let result = LjpegWriter.write_lossless(&short, &mut out, &EncoderConfig::default());
        assert!(matches!(result, Err(ConversionError::EncodeError(_))));
    }
}
