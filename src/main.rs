use std::process;
use log::debug;

use tiffstack::commands::{build_cli, CommandFactory, TiffstackCommandFactory};
use tiffstack::utils::logger::{Logger, DEFAULT_LOG_FILE};
use tiffstack::TiffResult;

const GLOBAL_LOG_FILE: &str = "tiffstack-global.log";

fn run(matches: &clap::ArgMatches, logger: &Logger) -> TiffResult<()> {
    let command = TiffstackCommandFactory::new().create_command(matches, logger)?;
    debug!("Running {} command", command.name());
    command.execute()
}

fn main() {
    let matches = build_cli().get_matches();

    if let Err(e) = Logger::init_global_logger(GLOBAL_LOG_FILE, matches.get_flag("verbose")) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let logger = match Logger::new(DEFAULT_LOG_FILE) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&matches, &logger) {
        let _ = logger.log(&format!("Error: {}", e));
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
