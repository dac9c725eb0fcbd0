//! Lossless encoder configuration and raster geometry types

/// Number of logical channels the CFA encoder works with. Each column pair of
/// a Bayer row holds one sample of each channel (R/G or G/B).
pub const CFA_CHANNELS: usize = 2;

/// Number of source rows merged into one logical row.
pub const ROW_INTERLEAVE: usize = 2;

/// Code tables the encoder builds: one per channel slot, or a single shared one.
pub const fn table_count(multi_table: bool) -> usize {
    if multi_table { CFA_CHANNELS } else { 1 }
}

/// Shape of the source raster and of the padded working raster.
///
/// All column counts are in samples. The caller guarantees
/// `out_rows >= enc_rows`, `out_cols >= enc_cols`, that both output
/// dimensions are even, and that `row_width >= enc_cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Rows holding valid samples
    pub enc_rows: usize,
    /// Valid samples per row
    pub enc_cols: usize,
    /// Rows of the padded working raster
    pub out_rows: usize,
    /// Samples per row of the padded working raster
    pub out_cols: usize,
    /// Distance in samples between the starts of two source rows
    pub row_width: usize,
    /// Channels per column pair; must be [`CFA_CHANNELS`]
    pub channels: usize,
    /// Significant bits per sample (1..=16)
    pub bit_depth: u32,
}

impl Geometry {
    /// Geometry for a tightly packed `width × height` mosaic, padded up to even
    /// dimensions.
    pub fn for_image(width: usize, height: usize, bit_depth: u32) -> Self {
        Self {
            enc_rows: height,
            enc_cols: width,
            out_rows: height.next_multiple_of(2),
            out_cols: width.next_multiple_of(2),
            row_width: width,
            channels: CFA_CHANNELS,
            bit_depth,
        }
    }

    /// Samples in one merged logical row.
    pub fn merged_width(&self) -> usize {
        self.out_cols * ROW_INTERLEAVE
    }

    /// Merged row pairs in the working raster.
    pub fn merged_rows(&self) -> usize {
        self.out_rows / ROW_INTERLEAVE
    }

    /// Residuals produced by one pass over the working raster.
    pub fn residual_count(&self) -> usize {
        self.out_rows * self.out_cols
    }

    /// Smallest source buffer the geometry can be read from.
    pub fn required_samples(&self) -> usize {
        match self.enc_rows {
            0 => 0,
            rows => (rows - 1) * self.row_width + self.enc_cols,
        }
    }

    /// Predictor seed for the first merged row.
    pub fn mid_gray(&self) -> u16 {
        (1u32 << (self.bit_depth - 1)) as u16
    }
}

/// Configuration for the lossless CFA encoder
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Use a separate Huffman table for the second channel slot
    pub multi_table: bool,
    /// Bit depth to encode with instead of the one reported by the reader
    pub bit_depth: Option<u32>,
    /// Whether to validate image dimensions before encoding
    pub validate_dimensions: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            multi_table: true,
            bit_depth: None,
            validate_dimensions: true,
        }
    }
}

impl EncoderConfig {
    pub fn builder() -> EncoderConfigBuilder {
        EncoderConfigBuilder::default()
    }

    /// Number of code tables the encoder generates.
    pub fn table_count(&self) -> usize {
        table_count(self.multi_table)
    }
}

/// Builder for EncoderConfig
#[derive(Default)]
pub struct EncoderConfigBuilder {
    multi_table: Option<bool>,
    bit_depth: Option<Option<u32>>,
    validate_dimensions: Option<bool>,
}

impl EncoderConfigBuilder {
    pub fn multi_table(mut self, enable: bool) -> Self {
        self.multi_table = Some(enable);
        self
    }

    pub fn bit_depth(mut self, bit_depth: Option<u32>) -> Self {
        self.bit_depth = Some(bit_depth);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn build(self) -> EncoderConfig {
        let default = EncoderConfig::default();
        EncoderConfig {
            multi_table: self.multi_table.unwrap_or(default.multi_table),
            bit_depth: self.bit_depth.unwrap_or(default.bit_depth),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
        }
    }
}
