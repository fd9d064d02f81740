//! Directory to multi-page TIFF conversion command

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::config::{self, ConversionConfig};
use crate::loader::{ColorSpace, Dpi};
use crate::pipeline::ConversionPipeline;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::logger::Logger;

/// Command for converting a directory of images into one TIFF
pub struct ConvertCommand<'a> {
    /// Settings after file and flag overrides
    config: ConversionConfig,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ConvertCommand<'a> {
    /// Create a new convert command
    ///
    /// Settings come from the defaults or `--config`, then the individual
    /// flags. Every value is validated here, before any file is read.
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> TiffResult<Self> {
        let config = Self::config_from_args(args)?;
        debug!("Effective configuration: {}", config);

        Ok(ConvertCommand {
            config,
            logger,
        })
    }

    /// Merge the configuration file and command-line flags
    pub fn config_from_args(args: &ArgMatches) -> TiffResult<ConversionConfig> {
        let mut config = match args.get_one::<String>("config") {
            Some(path) => ConversionConfig::from_toml_file(Path::new(path))?,
            None => ConversionConfig::default(),
        };

        if let Some(input) = args.get_one::<String>("input") {
            config.input_directory = PathBuf::from(input);
        }

        if let Some(output) = args.get_one::<String>("output") {
            config.output_file = PathBuf::from(output);
        }

        if let Some(compression) = args.get_one::<String>("compression") {
            config.compression = compression.clone();
        }

        if let Some(color_space) = args.get_one::<String>("color-space") {
            config.color_space = ColorSpace::from_str(color_space)?;
        }

        if let Some(quality) = args.get_one::<String>("quality") {
            let value = quality.trim().parse::<i64>()
                .map_err(|_| TiffError::ConfigError(format!("Invalid quality: '{}'", quality)))?;
            config.quality = config::parse_quality(value)?;
        }

        if let Some(dpi) = args.get_one::<String>("dpi") {
            config.dpi = Dpi::from_str(dpi)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}

impl<'a> Command for ConvertCommand<'a> {
    fn name(&self) -> &'static str {
        "convert"
    }

    fn execute(&self) -> TiffResult<()> {
        info!("Converting {}", self.config);

        let result = ConversionPipeline::new(&self.config)
            .with_logger(self.logger)
            .with_progress(true)
            .run()?;

        let noun = if result.pages_written == 1 { "page" } else { "pages" };
        for message in [
            format!("Wrote {} {}", result.pages_written, noun),
            format!("Conversion completed. Output saved as {}.", result.output_path.display()),
        ] {
            println!("{}", message);
            self.logger.log(&message)?;
        }

        Ok(())
    }
}
