//! Residual consumers for the two encoding passes.

use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::jpeg::bitstream::BitWriter;
use crate::image_pipeline::jpeg::huffman::CodeTable;
use crate::image_pipeline::lossless::category::{CategoryTable, CATEGORY_COUNT, MAX_CATEGORY};
use crate::image_pipeline::lossless::types::CFA_CHANNELS;

/// Receives every residual of a pass, in raster order, together with the
/// channel route (table slot) it belongs to.
pub trait ResidualSink {
    fn visit(&mut self, residual: i32, route: usize) -> Result<()>;
}

/// Category counts for one channel route.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; CATEGORY_COUNT],
}

impl Histogram {
    #[inline]
    pub fn record(&mut self, category: u8) {
        self.counts[category as usize] += 1;
    }

    pub fn counts(&self) -> &[u64; CATEGORY_COUNT] {
        &self.counts
    }

    pub fn get(&self, category: u8) -> u64 {
        self.counts[category as usize]
    }

    /// Residuals recorded across all categories.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Pass 1: histogram of residual categories per route.
pub struct StatisticsCollector<'a> {
    categories: &'a CategoryTable,
    histograms: [Histogram; CFA_CHANNELS],
}

impl<'a> StatisticsCollector<'a> {
    pub fn new(categories: &'a CategoryTable) -> Self {
        Self {
            categories,
            histograms: [Histogram::default(); CFA_CHANNELS],
        }
    }

    pub fn into_histograms(self) -> [Histogram; CFA_CHANNELS] {
        self.histograms
    }
}

impl ResidualSink for StatisticsCollector<'_> {
    #[inline]
    fn visit(&mut self, residual: i32, route: usize) -> Result<()> {
        let category = self.categories.category(residual.unsigned_abs());
        self.histograms[route].record(category);
        Ok(())
    }
}

/// Pass 2: entropy code plus payload bits for each residual.
///
/// Negative residuals transmit the one's complement of their magnitude, so
/// the top payload bit alone tells the sign. Category 16 transmits no payload
/// at all: only a residual of magnitude 32768 survives that round trip.
pub struct ResidualEncoder<'a, W: Write> {
    categories: &'a CategoryTable,
    tables: &'a [CodeTable],
    bits: &'a mut BitWriter<W>,
}

impl<'a, W: Write> ResidualEncoder<'a, W> {
    pub fn new(categories: &'a CategoryTable, tables: &'a [CodeTable], bits: &'a mut BitWriter<W>) -> Self {
        Self { categories, tables, bits }
    }
}

impl<W: Write> ResidualSink for ResidualEncoder<'_, W> {
    #[inline]
    fn visit(&mut self, residual: i32, route: usize) -> Result<()> {
        let magnitude = residual.unsigned_abs();
        let category = self.categories.category(magnitude);
        let value = if residual < 0 { !magnitude } else { magnitude };

        let code = self.tables[route].code(category);
        debug_assert!(code.len > 0, "category {} has no code on route {}", category, route);
        self.bits.write_bits(code.len as u32, code.code as u32)?;
        if category != MAX_CATEGORY {
            self.bits.write_bits(category as u32, value)?;
        }
        Ok(())
    }
}

/// Inverse of the payload convention for categories below 16.
pub fn residual_from_payload(category: u8, value: u32) -> i32 {
    if category == 0 {
        return 0;
    }
    let mask = (1u32 << category) - 1;
    let value = value & mask;
    if value >> (category - 1) == 1 {
        value as i32
    } else {
        -((!value & mask) as i32)
    }
}
