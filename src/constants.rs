//! Common constants used throughout the ccx application.

/// Directory under the user's home holding configuration and default template roots
pub const CCX_DIR_NAME: &str = ".ccx";

/// User configuration file name inside [`CCX_DIR_NAME`]
pub const CCX_CONFIG_FILENAME: &str = "ccx-config.yml";

/// Per-template manifest file name
pub const MANIFEST_FILE: &str = "ccx.yml";

/// Variable declarations of a cookiecutter template
pub const COOKIECUTTER_FILE: &str = "cookiecutter.json";

/// Default search directory names under [`CCX_DIR_NAME`]
pub const SIMPLE_TEMPLATES_DIR: &str = "simple-templates";
pub const COOKIECUTTER_TEMPLATES_DIR: &str = "cookiecutter-templates";

/// Commands printed in generated example invocations
pub const SIMPLE_PROCESS_COMMAND: &str = "ccx simple process";
pub const COOKIECUTTER_PROCESS_COMMAND: &str = "ccx cc process";
