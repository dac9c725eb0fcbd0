use std::env;
use std::path::Path;
use std::process;

use anyhow::Context;
use cfa_lossless_rs::image_pipeline::{
    EncoderConfig, LjpegWriter, RawToLjpegPipeline, TiffRasterReader,
};
use cfa_lossless_rs::logger;

use tracing::{error, info};

struct CliArgs {
    input_path: String,
    output_path: String,
    verbose: bool,
    config: EncoderConfig,
}

fn usage() -> ! {
    eprintln!("Usage: cfa_lossless_rs <input.(arw|cr2|nef|dng|tiff)> -o <output.ljpeg> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --single-table     Share one Huffman table between both channel slots");
    eprintln!("  --bit-depth <N>    Encode with N bits per sample (1-16) instead of the detected depth");
    eprintln!("  --no-validate      Skip image dimension validation");
    eprintln!("  -v, --verbose      Debug logging with per-step timings");
    process::exit(1);
}

fn parse_bit_depth(s: &str) -> Result<u32, String> {
    let v: u32 = s.parse().map_err(|_| format!("invalid bit depth: {s}"))?;
    if !(1..=16).contains(&v) {
        return Err(format!("unsupported bit depth: {v}"));
    }
    Ok(v)
}

fn parse_cli() -> CliArgs {
    let mut positional = Vec::new();
    let mut output_path: Option<String> = None;
    let mut verbose = false;
    let mut builder = EncoderConfig::builder();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => output_path = Some(args.next().unwrap_or_else(|| usage())),
            "--single-table" => builder = builder.multi_table(false),
            "--no-validate" => builder = builder.validate_dimensions(false),
            "-v" | "--verbose" => verbose = true,
            "--bit-depth" => {
                let value = args.next().unwrap_or_default();
                let bits = parse_bit_depth(&value).unwrap_or_else(|e| {
                    eprintln!("Error: {e}");
                    process::exit(1);
                });
                builder = builder.bit_depth(Some(bits));
            }
            "-h" | "--help" => usage(),
            other if other.starts_with('-') => {
                eprintln!("Error: unknown option: {other}");
                usage();
            }
            _ => positional.push(arg),
        }
    }

    let (Some(input_path), Some(output_path)) = (positional.pop(), output_path) else {
        usage();
    };
    if !positional.is_empty() {
        usage();
    }

    CliArgs {
        input_path,
        output_path,
        verbose,
        config: builder.build(),
    }
}

fn is_tiff(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
}

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    logger::init(cli.verbose);

    info!("Starting cfa_lossless_rs...");
    info!("Huffman tables: {}", cli.config.table_count());
    if let Some(bits) = cli.config.bit_depth {
        info!("Bit depth override: {}", bits);
    }

    let result = if is_tiff(&cli.input_path) {
        RawToLjpegPipeline::with_custom(TiffRasterReader, LjpegWriter, cli.config)
            .convert_file(&cli.input_path, &cli.output_path)
    } else {
        RawToLjpegPipeline::new(cli.config).convert_file(&cli.input_path, &cli.output_path)
    };

    match result {
        Ok(summary) => {
            info!(
                residuals = summary.residual_count(),
                bytes = summary.total_bytes,
                "Conversion successful!"
            );
            Ok(())
        }
        Err(e) => {
            error!("Conversion failed: {}", e);
            Err(e).with_context(|| format!("{} -> {}", cli.input_path, cli.output_path))
        }
    }
}
