//! RAW image reading module
//!
//! This module provides format-agnostic reading of undemosaiced sensor data.

mod reader;
mod rawloader_reader;
mod tiff_reader;
pub mod types;

pub use reader::RawImageReader;
pub use rawloader_reader::RawLoaderReader;
pub use tiff_reader::TiffRasterReader;
pub use types::RawImageData;
