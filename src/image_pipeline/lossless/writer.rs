use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::RawImageData;
use crate::image_pipeline::lossless::encoder::EncodeSummary;
use crate::image_pipeline::lossless::types::EncoderConfig;

pub trait LosslessWriter {
    fn write_lossless(&self, image: &RawImageData, output: &mut dyn Write, config: &EncoderConfig) -> Result<EncodeSummary>;
}
