//! Reader for undemosaiced Bayer mosaics stored as grayscale TIFF.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::RawImageData;
use crate::image_pipeline::raw::reader::RawImageReader;

/// Reads 8- or 16-bit single-channel TIFFs holding a CFA mosaic.
///
/// The TIFF sample size says nothing about the sensor, so the bit depth is
/// taken from the largest sample in the image.
pub struct TiffRasterReader;

impl RawImageReader for TiffRasterReader {
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding TIFF mosaic, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let color_type = decoder.colortype()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;
        if !matches!(color_type, ColorType::Gray(8) | ColorType::Gray(16)) {
            return Err(ConversionError::UnsupportedFormat(format!("TIFF color type {:?}", color_type)));
        }

        let (width, height) = decoder.dimensions()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let samples: Vec<u16> = match decoder.read_image()
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?
        {
            DecodingResult::U16(values) => values,
            DecodingResult::U8(values) => values.into_iter().map(u16::from).collect(),
            _ => return Err(ConversionError::UnsupportedFormat("TIFF sample format".to_string())),
        };

        let mut image = RawImageData {
            width: width as usize,
            height: height as usize,
            data: samples,
            bits_per_sample: 16,
        };
        image.bits_per_sample = image.significant_bits();

        debug!("Decoded TIFF mosaic: {}x{}, {} significant bits", width, height, image.bits_per_sample);
        Ok(image)
    }
}
