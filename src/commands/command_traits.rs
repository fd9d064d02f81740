//! Command pattern interfaces
//!
//! The binary turns its parsed arguments into one `Command` and runs it.

use crate::utils::logger::Logger;
use crate::tiff::errors::TiffResult;

/// One CLI operation, fully configured before it runs
pub trait Command {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Run the operation
    fn execute(&self) -> TiffResult<()>;
}

/// Picks and configures a `Command` from parsed arguments
///
/// Configuration problems are reported here, before anything executes.
pub trait CommandFactory<'a> {
    fn create_command(&self, args: &clap::ArgMatches, logger: &'a Logger) -> TiffResult<Box<dyn Command + 'a>>;
}
