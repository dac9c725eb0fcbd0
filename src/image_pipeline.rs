//! Image processing pipeline module
//!
//! This module provides a structured approach to lossless CFA compression,
//! with separate modules for RAW reading, the predictive encoder, the lossless
//! JPEG bitstream, and conversion orchestration.

pub mod raw;
pub mod lossless;
pub mod jpeg;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    RawImageData,
    RawImageReader,
    RawLoaderReader,
    TiffRasterReader,
};

pub use lossless::{
    EncoderConfig,
    EncoderConfigBuilder,
    EncodeSummary,
    Geometry,
    LosslessEncoder,
    LosslessWriter,
    LjpegWriter,
};

pub use conversions::{
    RawToLjpegPipeline,
};
