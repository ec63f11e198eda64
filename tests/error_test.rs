use std::io;

use ccx::error::{Error, EXIT_SOFTWARE, EXIT_USAGE};

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::TypeInferenceError { name: "logs".to_string() };
    assert_eq!(err.to_string(), "Unable to determine the variable type for logs");

    let err = Error::DestinationExistsError { kind: "file", path: "./run.sh".to_string() };
    assert_eq!(err.to_string(), "Destination file ./run.sh exists; to overwrite pass overwrite flag");
}

#[test]
fn test_exit_codes() {
    assert_eq!(Error::ArgumentBindingError("unrecognized arguments: x".to_string()).exit_code(), EXIT_USAGE);
    assert_eq!(
        Error::CommandGenerationError { var_type: "list".to_string() }.exit_code(),
        EXIT_SOFTWARE
    );
    assert_eq!(Error::TemplateNotFoundError { name: "x".to_string() }.exit_code(), 1);
}
