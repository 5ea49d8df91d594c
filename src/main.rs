use std::process::ExitCode;

use clap::Parser;

use paint_window::cli::Cli;
use paint_window::config::AppConfig;
use paint_window::logging::{init_logging, LoggingConfig};
use paint_window::platform;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig::with_filter(cli.log.clone()));

    let config = match AppConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };
    log::debug!("{:?}", config);

    match platform::run(config) {
        Ok(status) => status.into(),
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
