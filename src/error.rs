//! Error handling for the ccx application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Exit status for invalid command-line input.
pub const EXIT_USAGE: i32 = 2;

/// Exit status for internal invariant violations.
pub const EXIT_SOFTWARE: i32 = 70;

/// Custom error types for ccx operations.
///
/// This enum represents all possible errors that can occur within the ccx application.
/// It implements the standard Error trait through thiserror's derive macro.
#[derive(Error, Debug)]
pub enum Error {
    /// A variable declares no type and none can be inferred from its default
    #[error("Unable to determine the variable type for {name}")]
    TypeInferenceError { name: String },

    /// Command-line tokens do not satisfy the template's argument grammar
    #[error("{0}")]
    ArgumentBindingError(String),

    /// A variable type reached the example command generator that it can't express
    #[error("Unsupported variable type {var_type} in command generation")]
    CommandGenerationError { var_type: String },

    /// Two variables of one template share a name
    #[error("Duplicate variable {name}")]
    DuplicateVariableError { name: String },

    /// No template with the requested name in any search path
    #[error("Template {name} not found")]
    TemplateNotFoundError { name: String },

    /// Template directory or manifest is malformed
    #[error("{0}")]
    InvalidTemplateError(String),

    /// Output would overwrite an existing path
    #[error("Destination {kind} {path} exists; to overwrite pass overwrite flag")]
    DestinationExistsError { kind: &'static str, path: String },

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during template rendering
    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Returns the process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ArgumentBindingError(_) => EXIT_USAGE,
            Error::CommandGenerationError { .. } => EXIT_SOFTWARE,
            _ => 1,
        }
    }
}

/// Convenience type alias for Results with Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with the error's exit code
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{err}");
    std::process::exit(err.exit_code());
}
