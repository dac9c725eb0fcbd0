//! RAW image data types

/// Undemosaiced sensor data, one sample per photosite
#[derive(Debug, Clone)]
pub struct RawImageData {
    /// Width of the mosaic in samples
    pub width: usize,
    /// Height of the mosaic in rows
    pub height: usize,
    /// Row-major CFA samples, `width` per row
    pub data: Vec<u16>,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
}

impl RawImageData {
    /// Bits needed for the largest sample present, at least 1.
    pub fn significant_bits(&self) -> u32 {
        let max = self.data.iter().copied().max().unwrap_or(0);
        (u16::BITS - max.leading_zeros()).max(1)
    }
}
