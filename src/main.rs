use std::process;
use log::{error, warn, LevelFilter};

use rastermask::commands::{build_cli, CommandFactory, RastermaskCommandFactory};
use rastermask::config::Config;
use rastermask::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();
    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    Logger::install_console(level);

    let config = match matches.get_one::<String>("config") {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    if let Some(log_file) = config.log_file.as_deref() {
        if let Err(e) = Logger::log_to_file(log_file) {
            warn!("Cannot open log file {}, logging to the console only: {}", log_file, e);
        }
    }

    let factory = RastermaskCommandFactory::new();

    let command_result = factory.create_command(&matches, &config);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            process::exit(1);
        }
    };
}
