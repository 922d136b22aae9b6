//! Routes from Source - HTTP route extraction from web projects in any language.
//!
//! This library finds the HTTP routes a project declares without compiling or parsing it.
//! Frameworks are described by plugins: YAML files holding regular expressions for route
//! declarations, path parameters and request hints. Adding a framework means adding a file.
//!
//! # Built-in Plugins
//!
//! - **express** (`.js`, `.ts`), **fastapi**, **flask** and **django** (`.py`)
//! - **laravel** (`.php`), **spring** (`.java`, `.kt`), **gin** (`.go`)
//!
//! # Architecture
//!
//! 1. [`plugin`] - Loads plugin definitions into a read-only registry
//! 2. [`scanner`] - Walks the project breadth-first, skipping dependency and build directories
//! 3. [`matcher`] - Applies a plugin's patterns to file content
//! 4. [`normalizer`] - Validates methods and attaches query/body hints
//! 5. [`extractor`] - Runs the pipeline over a project
//! 6. [`exporter`] - Renders routes as Postman, Insomnia, HTTPie, cURL or Markdown
//! 7. [`serializer`] - Serializes artifacts and writes them to disk
//!
//! # Example Usage
//!
//! ```no_run
//! use routes_from_source::{
//!     extractor::{FrameworkSelector, RouteExtractor},
//!     plugin::loader::{default_search_paths, PluginStore},
//!     exporter::ExportFormat,
//! };
//! use std::path::Path;
//!
//! let project = Path::new("./my-project");
//!
//! // Load plugins
//! let report = PluginStore::load_with_builtins(&default_search_paths(project, &[]));
//!
//! // Extract routes
//! let extraction = RouteExtractor::new(&report.registry)
//!     .extract(project, &FrameworkSelector::Auto)
//!     .unwrap();
//!
//! // Render a Postman collection
//! let collection = ExportFormat::Postman
//!     .render(&extraction.routes, "http://localhost:3000", "dev")
//!     .unwrap();
//! println!("{}", collection);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod matcher;
pub mod normalizer;
pub mod plugin;
pub mod route;
pub mod scanner;
pub mod serializer;
