//! Command-line definition

use clap::{Arg, ArgAction, Command as ClapCommand};

use crate::compression::CompressionFactory;
use crate::config;

/// Builds the argument parser for the `tiffstack` binary
pub fn build_cli() -> ClapCommand {
    let compression_help = format!(
        "Compression for every page ({}) [default: {}]",
        CompressionFactory::available_names().join(", "),
        config::DEFAULT_COMPRESSION
    );

    ClapCommand::new("tiffstack")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Maurice Schilpp")
        .about("Bundle a directory of JPEG/PNG images into a single multi-page TIFF")
        .arg(
            Arg::new("input")
                .help("Input directory, or the TIFF file to describe with --inspect [default: testImages]")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output TIFF file [default: output_compressed.tif]")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("compression")
                .long("compression")
                .help(compression_help)
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("color-space")
                .long("color-space")
                .help("Page color space (RGB, YCbCr, L) [default: YCbCr]")
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("quality")
                .long("quality")
                .help("JPEG quality, 0-100 [default: 30]")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("dpi")
                .long("dpi")
                .help("Resolution for images without one, as X,Y or N [default: 100,100]")
                .value_name("X,Y")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file with a [conversion] table")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Describe the pages of an existing TIFF instead of converting")
                .action(ArgAction::SetTrue),
        )
}
