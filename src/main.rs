use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use jotter::cli::{self, Args, Command};
use jotter::core::config;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to jotter.log in current directory.
    // The configured level is applied once config has been resolved.
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("jotter.log") {
        let _ = WriteLogger::init(LevelFilter::Trace, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(&file_config, &args.overrides());
    log::set_max_level(resolved.log_level);

    log::info!("Jotter starting up against {}", resolved.base_url);

    cli::run(args.command.unwrap_or(Command::List), &resolved).await
}
