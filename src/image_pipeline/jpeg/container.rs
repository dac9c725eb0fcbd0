//! Lossless JPEG (SOF3) framing around the entropy-coded segment.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::jpeg::huffman::{CodeTable, MAX_CODE_LENGTH};

const SOI: u16 = 0xFFD8;
const SOF3: u16 = 0xFFC3;
const DHT: u16 = 0xFFC4;
const SOS: u16 = 0xFFDA;
const EOI: u16 = 0xFFD9;

/// Predictor selection value for "left neighbour" (Ra).
const PREDICTOR_LEFT: u8 = 1;

/// Everything the frame header describes.
#[derive(Debug, Clone, Copy)]
pub struct FrameHeader<'a> {
    /// Logical rows (merged row pairs)
    pub rows: usize,
    /// Samples per logical row across all channels
    pub columns: usize,
    pub channels: usize,
    pub bit_depth: u32,
    /// One table, or one per channel when `multi_table` is set
    pub tables: &'a [CodeTable],
    pub multi_table: bool,
    /// Source rows merged into each logical row
    pub row_interleave: usize,
}

impl FrameHeader<'_> {
    /// Frame width in pixels; each pixel has one sample per channel.
    pub fn pixels_per_row(&self) -> usize {
        self.columns / self.channels
    }

    fn table_for_component(&self, component: usize) -> usize {
        if self.multi_table { component.min(self.tables.len() - 1) } else { 0 }
    }
}

/// Writes SOI, SOF3, the DHT segments and SOS. Returns the header length in bytes.
pub fn write_start(out: &mut dyn Write, header: &FrameHeader<'_>) -> Result<u64> {
    let width = header.pixels_per_row();
    if header.rows > u16::MAX as usize || width > u16::MAX as usize {
        return Err(ConversionError::FrameTooLarge { rows: header.rows, columns: header.columns });
    }
    if header.tables.is_empty() {
        return Err(ConversionError::EncodeError("no Huffman table for frame".to_string()));
    }

    let mut written = 2u64;
    out.write_u16::<BigEndian>(SOI)?;

    // SOF3
    let sof_len = 8 + 3 * header.channels as u16;
    out.write_u16::<BigEndian>(SOF3)?;
    out.write_u16::<BigEndian>(sof_len)?;
    out.write_u8(header.bit_depth as u8)?;
    out.write_u16::<BigEndian>(header.rows as u16)?;
    out.write_u16::<BigEndian>(width as u16)?;
    out.write_u8(header.channels as u8)?;
    for component in 0..header.channels {
        out.write_u8(component as u8)?;
        out.write_u8(0x11)?;
        out.write_u8(0)?;
    }
    written += 2 + sof_len as u64;

    for (id, table) in header.tables.iter().enumerate() {
        written += write_dht(out, id as u8, table)?;
    }

    // SOS
    let sos_len = 6 + 2 * header.channels as u16;
    out.write_u16::<BigEndian>(SOS)?;
    out.write_u16::<BigEndian>(sos_len)?;
    out.write_u8(header.channels as u8)?;
    for component in 0..header.channels {
        out.write_u8(component as u8)?;
        out.write_u8((header.table_for_component(component) as u8) << 4)?;
    }
    out.write_u8(PREDICTOR_LEFT)?;
    // Se is unused in lossless mode; carries the row interleave factor
    out.write_u8(header.row_interleave as u8)?;
    out.write_u8(0)?;
    written += 2 + sos_len as u64;

    debug!(
        rows = header.rows,
        width,
        tables = header.tables.len(),
        bytes = written,
        "Wrote lossless JPEG header"
    );
    Ok(written)
}

fn write_dht(out: &mut dyn Write, id: u8, table: &CodeTable) -> Result<u64> {
    let len = 2 + 1 + MAX_CODE_LENGTH as u16 + table.huffval().len() as u16;
    out.write_u16::<BigEndian>(DHT)?;
    out.write_u16::<BigEndian>(len)?;
    out.write_u8(id)?;
    out.write_all(table.bits())?;
    out.write_all(table.huffval())?;
    Ok(2 + len as u64)
}

/// Writes EOI.
pub fn write_end(out: &mut dyn Write) -> Result<u64> {
    out.write_u16::<BigEndian>(EOI)?;
    Ok(2)
}
