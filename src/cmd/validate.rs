//! `devserve --check`: validate the resolved configuration and exit.
//!
//! Resolves the mode, config file and CLI overrides exactly like a
//! normal start, reports every problem found, and never binds a socket.

use crate::cli::Cli;
use crate::config::model::FileConfig;
use crate::config::{apply_overrides, sources, validation, ServeMode};
use crate::error::DevserveError;

pub fn execute(cli: &Cli) -> Result<(), DevserveError> {
    let mode: ServeMode = cli.mode.parse()?;

    let (source, file_config) = match sources::load_file(cli.config.as_deref())? {
        Some((path, config)) => (path.display().to_string(), config),
        None => ("built-in defaults".to_string(), FileConfig::default()),
    };
    let config = apply_overrides(file_config, cli);

    if let Err(errors) = validation::validate(&config, mode) {
        eprintln!("\u{2717} {source} has {} errors\n", errors.len());
        for error in &errors {
            eprintln!("{error}");
        }
        return Err(DevserveError::ConfigValidation { errors });
    }

    println!(
        "\u{2713} {source}: {}",
        validation::format_validation_report(&config, mode)
    );
    Ok(())
}
