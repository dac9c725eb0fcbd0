//! Pipeline conversions module
//!
//! This module contains orchestration logic for RAW to lossless JPEG conversion.

mod raw_to_ljpeg;


pub use raw_to_ljpeg::RawToLjpegPipeline;
