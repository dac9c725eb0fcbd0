//! Lossless JPEG bitstream module
//!
//! Huffman table construction, bit packing and frame markers.

pub mod huffman;
pub mod bitstream;
pub mod container;

pub use huffman::{CodeTable, HuffCode};
pub use bitstream::BitWriter;
pub use container::FrameHeader;
