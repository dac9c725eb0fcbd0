use tracing::{info, instrument};
use std::io::Write;
use std::path::Path;

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    lossless::{EncodeSummary, EncoderConfig, LjpegWriter, LosslessWriter},
    raw::{RawImageReader, RawLoaderReader},
};

/// Largest mosaic accepted when dimension validation is on. The frame header
/// stores half the padded height as rows, and the padded width as pixels per
/// row, in 16-bit fields.
const MAX_WIDTH: usize = u16::MAX as usize - 1;
const MAX_HEIGHT: usize = 2 * u16::MAX as usize;

pub struct RawToLjpegPipeline<R: RawImageReader, W: LosslessWriter> {
    reader: R,
    writer: W,
    config: EncoderConfig,
}

impl RawToLjpegPipeline<RawLoaderReader, LjpegWriter> {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            reader: RawLoaderReader,
            writer: LjpegWriter,
            config,
        }
    }
}

impl<R: RawImageReader, W: LosslessWriter> RawToLjpegPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: EncoderConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize, samples: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width < 2 || height == 0 || width > MAX_WIDTH || height > MAX_HEIGHT {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        if samples < width * height {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<EncodeSummary> {
        info!("Starting RAW to lossless JPEG conversion");

        let raw_image = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(input_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = raw_image.width,
                height = raw_image.height
            ).entered();
            self.validate_dimensions(raw_image.width, raw_image.height, raw_image.data.len())?;
        }

        let summary = {
            let _span = tracing::info_span!("encode_ljpeg").entered();
            self.writer.write_lossless(&raw_image, output, &self.config)?
        };

        info!(
            width = raw_image.width,
            height = raw_image.height,
            bytes = summary.total_bytes,
            "Conversion complete"
        );
        Ok(summary)
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<EncodeSummary> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?
        };

        let mut output = std::io::BufWriter::new(output_file);
        let summary = self.convert(&input_data, &mut output)?;
        output.flush().map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
        })?;

        Ok(summary)
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EncoderConfig) {
        self.config = config;
    }
}
