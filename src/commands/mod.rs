//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod cli;
pub mod command_traits;
pub mod convert_command;
pub mod inspect_command;


pub use cli::build_cli;
pub use command_traits::{Command, CommandFactory};
pub use convert_command::ConvertCommand;
pub use inspect_command::InspectCommand;

use clap::ArgMatches;
use crate::utils::logger::Logger;
use crate::tiff::errors::TiffResult;

/// Factory for creating command instances based on CLI arguments
///
/// `--inspect` selects the inspect command; everything else converts.
#[derive(Default)]
pub struct TiffstackCommandFactory;

impl TiffstackCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        TiffstackCommandFactory
    }
}

impl<'a> CommandFactory<'a> for TiffstackCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> TiffResult<Box<dyn Command + 'a>> {
        if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(args, logger)?))
        } else {
            Ok(Box::new(ConvertCommand::new(args, logger)?))
        }
    }
}
