use crate::exporter::ExportFormat;
use crate::extractor::{FrameworkSelector, RouteExtractor};
use crate::plugin::loader::{default_search_paths, PluginStore};
use crate::plugin::PluginRegistry;
use crate::serializer::write_to_file;
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Routes from Source - Extract HTTP routes from web projects and export them as API client collections
#[derive(Parser, Debug)]
#[command(name = "routes-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the project directory
    #[arg(value_name = "PROJECT_PATH", default_value = ".")]
    pub project_path: PathBuf,

    /// Plugin to apply to every file, or "auto" to pick plugins by file extension
    #[arg(short = 'w', long = "framework", value_name = "NAME", default_value = "auto")]
    pub framework: FrameworkSelector,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "postman")]
    pub output_format: ExportFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Base URL prepended to every route
    #[arg(short = 'b', long = "base-url", value_name = "URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Environment label embedded in the generated artifact
    #[arg(short = 'e', long = "env", value_name = "LABEL", default_value = "dev")]
    pub env_label: String,

    /// Additional plugin directory, searched before the default ones (repeatable)
    #[arg(long = "plugins-dir", value_name = "DIR")]
    pub plugins_dirs: Vec<PathBuf>,

    /// Print the registered plugins and exit
    #[arg(long = "list-plugins")]
    pub list_plugins: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.list_plugins {
        return Ok(args);
    }

    // Validate project path exists
    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    // Validate project path is a directory
    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Framework: {}", args.framework);
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Load the plugin registry for a project: command-line directories, then the
/// project, user and install directories, then the built-ins.
pub fn load_registry(args: &CliArgs) -> PluginRegistry {
    let search_paths = default_search_paths(&args.project_path, &args.plugins_dirs);
    debug!("Plugin search paths: {:?}", search_paths);

    let report = PluginStore::load_with_builtins(&search_paths);
    for dir in &report.loaded_dirs {
        info!("Loaded plugins from {}", dir.display());
    }
    if !report.warnings.is_empty() {
        warn!("{} plugin problem(s) were skipped", report.warnings.len());
    }
    report.registry
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    // Step 1: Build the plugin registry
    let registry = load_registry(&args);
    info!("{} plugins registered", registry.len());

    if args.list_plugins {
        for plugin in registry.iter() {
            println!(
                "{:<10} {:<28} {}",
                plugin.name,
                plugin.extensions.join(" "),
                plugin.description
            );
        }
        return Ok(());
    }

    // Step 2: Extract routes
    let extraction = RouteExtractor::new(&registry)
        .extract(&args.project_path, &args.framework)
        .with_context(|| format!("Failed to extract routes from {}", args.project_path.display()))?;

    if extraction.routes.is_empty() {
        warn!("No routes found in the project");
    }
    for route in &extraction.routes {
        debug!("Found route: {} {}", route.method, route.path);
    }

    // Step 3: Render the requested artifact
    info!("Rendering {:?} output...", args.output_format);
    let content = args
        .output_format
        .render(&extraction.routes, &args.base_url, &args.env_label)
        .context("Failed to render output")?;

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)
            .with_context(|| format!("Failed to write to file: {}", output_path.display()))?;
    } else {
        println!("{}", content);
    }

    // Step 5: Display summary
    info!("Summary:");
    info!("  - Files scanned: {}", extraction.files_scanned);
    info!("  - Files with routes: {}", extraction.files_with_routes);
    info!("  - Routes found: {}", extraction.routes.len());
    info!("  - Warnings: {}", extraction.warnings.len());

    Ok(())
}
