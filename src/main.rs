//! Routes from Source - Command-line tool for extracting HTTP routes.
//!
//! Scans a project, extracts the routes declared by any supported framework and
//! renders them as an API client collection.
//!
//! # Usage
//!
//! ```bash
//! routes-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate a Postman collection:
//! ```bash
//! routes-from-source ./my-api-project -o api.postman.json
//! ```
//!
//! Force the Laravel plugin and emit a curl script:
//! ```bash
//! routes-from-source ./my-api-project -w laravel -f curl -b https://staging.example.com
//! ```
//!
//! List registered plugins, including those in a custom directory:
//! ```bash
//! routes-from-source --plugins-dir ./my-plugins --list-plugins
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use routes_from_source::cli;

fn main() -> Result<()> {
    // Parse first so the verbose flag can pick the log level
    let parsed = cli::CliArgs::parse();

    init_logger(parsed.verbose, std::env::var_os("RUST_LOG").is_some());

    info!("Routes from Source starting...");

    let args = cli::parse_args_from_parsed(parsed)?;

    cli::run(args)?;

    info!("Route extraction completed successfully");

    Ok(())
}

/// `RUST_LOG` wins when set; otherwise Info, or Debug with `-v`.
fn init_logger(verbose: bool, rust_log_set: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = default_level(verbose, rust_log_set) {
        builder.filter_level(level);
    }
    builder.init();
}

fn default_level(verbose: bool, rust_log_set: bool) -> Option<log::LevelFilter> {
    match (rust_log_set, verbose) {
        (true, _) => None,
        (false, true) => Some(log::LevelFilter::Debug),
        (false, false) => Some(log::LevelFilter::Info),
    }
}
