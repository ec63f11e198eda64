//! Template renderer and rendering functionality for ccx.
//! Wraps MiniJinja with the text filters and globals available to every template.
use std::fmt::Write;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::Result;
use chrono::format::{Item, StrftimeItems};
use minijinja::{Environment, ErrorKind};
use regex::Regex;

/// Default format of the `n()` template global.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new renderer with block trimming, trailing newlines kept and the ccx filters
    /// installed.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        env.add_filter("snake_case", snake_case);
        env.add_filter("remove_extension", remove_extension);
        env.add_filter("java_package_to_dir", java_package_to_dir);
        env.add_function("n", now);

        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template doesn't parse or a filter fails
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        Ok(self.env.render_str(template, context)?)
    }
}

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("Invalid word regex"));
static BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("Invalid boundary regex"));

/// `CamelCase` to `camel_case`.
pub fn snake_case(value: String) -> String {
    let s1 = WORD.replace_all(&value, "${1}_${2}");
    BOUNDARY.replace_all(&s1, "${1}_${2}").to_lowercase()
}

/// Drops the last extension of the final path component.
pub fn remove_extension(value: String) -> String {
    let path = Path::new(&value);
    match path.extension() {
        Some(_) => path.with_extension("").to_string_lossy().into_owned(),
        None => value,
    }
}

/// `com.example.app` to `com/example/app`.
pub fn java_package_to_dir(value: String) -> std::result::Result<String, minijinja::Error> {
    if value.starts_with('.') {
        return Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            "Java package shouldn't start with '.'",
        ));
    }

    Ok(value.trim().replace('.', "/"))
}

/// Current local time, formatted with a strftime pattern.
pub fn now(format: Option<String>) -> std::result::Result<String, minijinja::Error> {
    let format = format.unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string());
    if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
        return Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid time format '{format}'"),
        ));
    }

    let mut out = String::new();
    write!(out, "{}", chrono::Local::now().format(&format)).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string())
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("CamelCase".to_string()), "camel_case");
        assert_eq!(snake_case("HTTPServer".to_string()), "http_server");
        assert_eq!(snake_case("already_snake".to_string()), "already_snake");
        assert_eq!(snake_case("getHTTPResponseCode".to_string()), "get_http_response_code");
    }

    #[test]
    fn test_remove_extension() {
        assert_eq!(remove_extension("Foo.h".to_string()), "Foo");
        assert_eq!(remove_extension("dir/a.tar.gz".to_string()), "dir/a.tar");
        assert_eq!(remove_extension("Makefile".to_string()), "Makefile");
        assert_eq!(remove_extension(".bashrc".to_string()), ".bashrc");
    }

    #[test]
    fn test_java_package_to_dir() {
        assert_eq!(java_package_to_dir(" com.example.app ".to_string()).unwrap(), "com/example/app");
        assert!(java_package_to_dir(".com.example".to_string()).is_err());
    }

    #[test]
    fn test_now_rejects_bad_format() {
        assert!(now(Some("%Q".to_string())).is_err());
        assert_eq!(now(Some("%Y".to_string())).unwrap().len(), 4);
    }
}
