//! TIFF page inspection command
//!
//! Prints one line per page of an existing TIFF, and the full tag list of
//! every IFD in verbose mode.

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::pages;
use crate::tiff::TiffReader;
use crate::utils::logger::Logger;

/// Command for describing the pages of a TIFF file
pub struct InspectCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Whether to print every tag
    verbose: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> InspectCommand<'a> {
    /// Create a new inspect command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> TiffResult<Self> {
        let input_file = args.get_one::<String>("input")
            .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))?
            .clone();

        let verbose = args.get_flag("verbose");

        Ok(InspectCommand {
            input_file,
            verbose,
            logger,
        })
    }
}

impl<'a> Command for InspectCommand<'a> {
    fn name(&self) -> &'static str {
        "inspect"
    }

    fn execute(&self) -> TiffResult<()> {
        info!("Inspecting file: {}", self.input_file);
        let path = std::path::Path::new(&self.input_file);

        let pages = pages::read_pages(path)?;
        println!("{}: {} page(s)", self.input_file, pages.len());
        for page in &pages {
            println!("  {}", page);
            self.logger.log(&page.to_string())?;
        }

        if self.verbose {
            let mut reader = TiffReader::new();
            let tiff = reader.load(path)?;
            if let Some(byte_order) = reader.byte_order() {
                println!("Byte order: {}", byte_order.name());
            }
            print!("{}", tiff);
        }

        debug!("Inspection completed successfully");
        self.logger.log("Inspection completed successfully")?;

        Ok(())
    }
}
