//! ccx generates files and whole projects from templates.
//! Simple templates render a flat list of files described by `ccx.yml`; cookiecutter templates
//! render a project tree. Template variables become command-line flags, and each template can
//! document itself with an example invocation.

/// Command-line interface module for the ccx application
pub mod cli;

/// Command execution for `simple`, `cc` and `quick-start`
pub mod commands;

/// User configuration and template search paths
pub mod config;

/// Common constants
pub mod constants;

/// Cookiecutter template generation
pub mod cookiecutter;

/// Template documentation and example command generation
pub mod doc;

/// Error types and handling for the ccx application
pub mod error;

/// Logging setup
pub mod logger;

/// Copying generated output into place with backups
pub mod materialize;

/// Template variables as command-line flags
pub mod parser;

/// Sample configuration and example template
pub mod quick_start;

/// MiniJinja environment with ccx's filters and functions
pub mod renderer;

/// Template lookup across search paths
pub mod resolver;

/// Simple template generation
pub mod simple;

/// Template manifests and shared template behaviour
pub mod template;

/// Variable model: types, values and declarations
pub mod variable;
