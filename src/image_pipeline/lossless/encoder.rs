//! Two-pass lossless CFA encoder.
//!
//! Pass 1 runs the interleaver with a [`StatisticsCollector`] to gather the
//! category histograms, the Huffman tables are built from them, and pass 2
//! runs the identical traversal with a [`ResidualEncoder`] between the frame
//! header and trailer.

use std::io::Write;

use tracing::{debug, info, instrument};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::jpeg::bitstream::BitWriter;
use crate::image_pipeline::jpeg::container::{self, FrameHeader};
use crate::image_pipeline::jpeg::huffman::CodeTable;
use crate::image_pipeline::lossless::category::{CategoryTable, CATEGORIES};
use crate::image_pipeline::lossless::interleave::RowInterleaver;
use crate::image_pipeline::lossless::sink::{Histogram, ResidualEncoder, StatisticsCollector};
use crate::image_pipeline::lossless::types::{table_count, EncoderConfig, Geometry, CFA_CHANNELS, ROW_INTERLEAVE};

/// Outcome of one encode call.
#[derive(Debug, Clone)]
pub struct EncodeSummary {
    pub geometry: Geometry,
    /// Pass-1 statistics; the second entry stays empty without `multi_table`
    pub histograms: [Histogram; CFA_CHANNELS],
    pub tables: Vec<CodeTable>,
    /// Header bytes (SOI through SOS)
    pub header_bytes: u64,
    /// Entropy-coded segment bytes, stuffing included
    pub entropy_bytes: u64,
    /// Everything written to the output
    pub total_bytes: u64,
}

impl EncodeSummary {
    pub fn residual_count(&self) -> u64 {
        self.histograms.iter().map(Histogram::total).sum()
    }
}

/// Lossless encoder for 2-channel CFA rasters.
#[derive(Clone, Copy)]
pub struct LosslessEncoder {
    multi_table: bool,
    categories: &'static CategoryTable,
}

impl LosslessEncoder {
    pub fn new(multi_table: bool) -> Self {
        Self { multi_table, categories: &CATEGORIES }
    }

    pub fn from_config(config: &EncoderConfig) -> Self {
        Self::new(config.multi_table)
    }

    /// Pass 1 only: the category histograms of `samples`.
    pub fn collect_statistics(&self, samples: &[u16], geometry: &Geometry) -> Result<[Histogram; CFA_CHANNELS]> {
        check_input(samples, geometry)?;
        let mut interleaver = RowInterleaver::new(samples, *geometry, self.multi_table);
        let mut collector = StatisticsCollector::new(self.categories);
        interleaver.run(&mut collector)?;
        Ok(collector.into_histograms())
    }

    /// Encodes `samples` as a lossless JPEG frame into `output`.
    ///
    /// Only 2-channel geometries over a buffer of at least
    /// [`Geometry::required_samples`] values are accepted; anything else fails
    /// before a single byte is written.
    #[instrument(skip_all, fields(rows = geometry.out_rows, cols = geometry.out_cols, multi_table = self.multi_table))]
    pub fn encode(&self, samples: &[u16], geometry: &Geometry, output: &mut dyn Write) -> Result<EncodeSummary> {
        check_input(samples, geometry)?;

        let mut interleaver = RowInterleaver::new(samples, *geometry, self.multi_table);

        let histograms = {
            let _span = tracing::debug_span!("collect_statistics").entered();
            let mut collector = StatisticsCollector::new(self.categories);
            interleaver.run(&mut collector)?;
            collector.into_histograms()
        };
        debug!(
            route0 = histograms[0].total(),
            route1 = histograms[1].total(),
            "Collected residual statistics"
        );

        let tables: Vec<CodeTable> = histograms[..table_count(self.multi_table)]
            .iter()
            .map(|h| CodeTable::from_frequencies(h.counts()))
            .collect();

        let header = FrameHeader {
            rows: geometry.merged_rows(),
            columns: geometry.merged_width(),
            channels: geometry.channels,
            bit_depth: geometry.bit_depth,
            tables: &tables,
            multi_table: self.multi_table,
            row_interleave: ROW_INTERLEAVE,
        };
        let header_bytes = container::write_start(output, &header)?;

        let entropy_bytes = {
            let _span = tracing::debug_span!("encode_residuals").entered();
            let mut bits = BitWriter::new(&mut *output);
            let mut encoder = ResidualEncoder::new(self.categories, &tables, &mut bits);
            interleaver.run(&mut encoder)?;
            bits.flush()?;
            bits.bytes_written()
        };

        let trailer_bytes = container::write_end(output)?;
        let total_bytes = header_bytes + entropy_bytes + trailer_bytes;

        info!(
            residuals = geometry.residual_count(),
            total_bytes,
            "Encoded lossless CFA frame"
        );

        Ok(EncodeSummary {
            geometry: *geometry,
            histograms,
            tables,
            header_bytes,
            entropy_bytes,
            total_bytes,
        })
    }
}

impl Default for LosslessEncoder {
    fn default() -> Self {
        Self::new(true)
    }
}

fn check_input(samples: &[u16], geometry: &Geometry) -> Result<()> {
    let Geometry { enc_rows, enc_cols, out_rows, out_cols, row_width, channels, .. } = *geometry;
    if channels != CFA_CHANNELS {
        return Err(ConversionError::UnsupportedChannels(channels));
    }

    let empty_rows = enc_rows > 0 && enc_cols == 0;
    if empty_rows || out_cols < enc_cols || out_rows < enc_rows || (enc_rows > 1 && row_width < enc_cols) {
        return Err(ConversionError::InvalidDimensions(enc_cols, enc_rows));
    }

    if samples.len() < geometry.required_samples() {
        return Err(ConversionError::EncodeError(format!(
            "sample buffer holds {} values, {}x{} with stride {} needs {}",
            samples.len(),
            enc_cols,
            enc_rows,
            row_width,
            geometry.required_samples()
        )));
    }
    Ok(())
}
