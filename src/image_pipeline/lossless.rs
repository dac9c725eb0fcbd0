//! Lossless CFA encoding module
//!
//! This module contains the predictive transform and the two-pass entropy
//! coding pipeline for raw Bayer data, plus the writer that frames it as a
//! lossless JPEG.

pub mod category;
pub mod types;
pub mod sink;
pub mod predictor;
pub mod interleave;
pub mod encoder;
mod writer;
mod ljpeg_writer;

pub use category::{CategoryTable, CATEGORIES, CATEGORY_COUNT};
pub use types::{EncoderConfig, EncoderConfigBuilder, Geometry, CFA_CHANNELS, ROW_INTERLEAVE};
pub use sink::{Histogram, ResidualSink, StatisticsCollector, ResidualEncoder};
pub use interleave::RowInterleaver;
pub use encoder::{EncodeSummary, LosslessEncoder};
pub use writer::LosslessWriter;
pub use ljpeg_writer::LjpegWriter;
