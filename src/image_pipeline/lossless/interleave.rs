//! Bayer-aware row merging.
//!
//! A CFA mosaic alternates two colour pairs row by row:
//!
//! ```text
//! RGRGRG...
//! GBGBGB...
//! RGRGRG...
//! GBGBGB...
//! ```
//!
//! Predicting from the row above would mix colours. Merging every two source
//! rows into one logical row gives
//!
//! ```text
//! RGRGRG...GBGBGB...
//! RGRGRG...GBGBGB...
//! ```
//!
//! so that each logical row lines up with the one above it colour for colour.
//! Only the pair of samples where the colours switch is poorly predicted.

use tracing::trace;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::lossless::predictor::walk_row;
use crate::image_pipeline::lossless::sink::ResidualSink;
use crate::image_pipeline::lossless::types::{Geometry, ROW_INTERLEAVE};

/// Walks a raster one merged row pair at a time.
///
/// The two row buffers are allocated once and reused by every pass.
pub struct RowInterleaver<'a> {
    samples: &'a [u16],
    geometry: Geometry,
    table1: usize,
    previous: Vec<u16>,
    current: Vec<u16>,
}

impl<'a> RowInterleaver<'a> {
    /// `samples` must hold at least [`Geometry::required_samples`] values.
    pub fn new(samples: &'a [u16], geometry: Geometry, multi_table: bool) -> Self {
        let width = geometry.merged_width();
        Self {
            samples,
            geometry,
            table1: usize::from(multi_table),
            previous: vec![0; width],
            current: vec![0; width],
        }
    }

    /// Sends every residual of the working raster to `sink`: first the
    /// residuals of the merged source rows, then zero residuals for the
    /// filler rows below them.
    pub fn run<S: ResidualSink>(&mut self, sink: &mut S) -> Result<()> {
        let geometry = self.geometry;

        let mut row = 0;
        while row < geometry.enc_rows {
            if row == 0 {
                let seed = geometry.mid_gray();
                self.previous[0] = seed;
                self.previous[1] = seed;
            }

            self.merge_pair(row);
            walk_row(&self.previous, &self.current, sink, self.table1)?;
            std::mem::swap(&mut self.previous, &mut self.current);

            row += ROW_INTERLEAVE;
        }

        if row < geometry.out_rows {
            trace!(from = row, to = geometry.out_rows, "Emitting filler rows");
        }
        while row < geometry.out_rows {
            for _ in 0..geometry.out_cols {
                sink.visit(0, 0)?;
                sink.visit(0, self.table1)?;
            }
            row += ROW_INTERLEAVE;
        }
        Ok(())
    }

    /// Fills `current` with source rows `row` and `row + 1`, each padded out
    /// to `out_cols` by repeating its last sample pair. A missing second row
    /// (odd `enc_rows`) repeats the first. A one-sample row has no odd
    /// sample, so its padding repeats the single sample.
    fn merge_pair(&mut self, row: usize) {
        let Geometry { enc_rows, enc_cols, out_cols, row_width, .. } = self.geometry;

        for (half, dst) in self.current.chunks_exact_mut(out_cols).enumerate() {
            let mut src_row = row + half;
            if src_row >= enc_rows {
                src_row = row;
            }
            let start = src_row * row_width;
            dst[..enc_cols].copy_from_slice(&self.samples[start..start + enc_cols]);
            for col in enc_cols..out_cols {
                dst[col] = dst[col.saturating_sub(2)];
            }
        }
    }
}
