//! User configuration for ccx.
//! Reads `~/.ccx/ccx-config.yml`, which tells ccx where to look for simple and
//! cookiecutter templates.

use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::constants::{
    CCX_CONFIG_FILENAME, CCX_DIR_NAME, COOKIECUTTER_TEMPLATES_DIR, SIMPLE_TEMPLATES_DIR,
};
use crate::error::{Error, Result};
use crate::resolver::TemplateResolver;

/// Configuration key listing simple template search paths.
pub const SIMPLE_TEMPLATE_PATHS_KEY: &str = "simple_templates.paths";

/// Configuration key listing cookiecutter template search paths.
pub const COOKIECUTTER_TEMPLATE_PATHS_KEY: &str = "cookiecutter_templates.paths";

#[derive(Debug, Clone)]
pub struct Config {
    base_path: PathBuf,
    configs_path: PathBuf,
    values: serde_yaml::Value,
}

impl Config {
    /// Loads the configuration from the user's home directory.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the home directory is unknown or the file is not valid YAML
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::ConfigError("unable to determine the home directory".to_string())
        })?;
        Self::load_from(home.join(CCX_DIR_NAME))
    }

    /// Loads `ccx-config.yml` from `base_path`; a missing file is an empty configuration.
    pub fn load_from<P: Into<PathBuf>>(base_path: P) -> Result<Self> {
        let base_path = base_path.into();
        let configs_path = base_path.join(CCX_CONFIG_FILENAME);

        let values = if configs_path.exists() {
            debug!("Loading configuration from {}", configs_path.display());
            let content = std::fs::read_to_string(&configs_path)?;
            if content.trim().is_empty() {
                serde_yaml::Value::Null
            } else {
                serde_yaml::from_str(&content).map_err(|e| {
                    Error::ConfigError(format!("invalid {}: {}", configs_path.display(), e))
                })?
            }
        } else {
            debug!("No configuration at {}", configs_path.display());
            serde_yaml::Value::Null
        };

        Ok(Self { base_path, configs_path, values })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn configs_path(&self) -> &Path {
        &self.configs_path
    }

    /// Looks a value up by dotted key, e.g. `simple_templates.paths`.
    ///
    /// # Errors
    /// * `Error::ConfigError` if `key` is empty
    pub fn get(&self, key: &str) -> Result<Option<&serde_yaml::Value>> {
        if key.is_empty() {
            return Err(Error::ConfigError("Must provide a variable name to search".to_string()));
        }

        let mut current = &self.values;
        for part in key.split('.') {
            match current.get(part) {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Expands `~`, resolves relative paths against the configuration directory and collapses
    /// `.` and `..` components.
    pub fn normalize_path(&self, path: &str) -> PathBuf {
        let expanded = if path.starts_with('~') {
            PathBuf::from(shellexpand::tilde(path).into_owned())
        } else {
            PathBuf::from(path)
        };

        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            self.configs_path.parent().unwrap_or(&self.base_path).join(expanded)
        };

        normalize_lexically(&absolute)
    }

    /// Paths stored under `key` as a single string or a list, normalized and sorted.
    pub fn normalized_paths(&self, key: &str) -> Result<Vec<PathBuf>> {
        let raw: Vec<&str> = match self.get(key)? {
            None | Some(serde_yaml::Value::Null) => Vec::new(),
            Some(serde_yaml::Value::String(path)) => vec![path.as_str()],
            Some(serde_yaml::Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().ok_or_else(|| {
                        Error::ConfigError(format!("{key} must contain only paths"))
                    })
                })
                .collect::<Result<_>>()?,
            Some(_) => {
                return Err(Error::ConfigError(format!(
                    "{key} must be a path or a list of paths"
                )))
            }
        };

        let mut paths: Vec<PathBuf> = raw.into_iter().map(|p| self.normalize_path(p)).collect();
        paths.sort();
        Ok(paths)
    }

    fn paths_or_default(&self, key: &str, default_dir: &str) -> Result<Vec<PathBuf>> {
        let paths = self.normalized_paths(key)?;
        if paths.is_empty() {
            return Ok(vec![self.base_path.join(default_dir)]);
        }
        Ok(paths)
    }

    pub fn simple_template_paths(&self) -> Result<Vec<PathBuf>> {
        self.paths_or_default(SIMPLE_TEMPLATE_PATHS_KEY, SIMPLE_TEMPLATES_DIR)
    }

    pub fn cookiecutter_template_paths(&self) -> Result<Vec<PathBuf>> {
        self.paths_or_default(COOKIECUTTER_TEMPLATE_PATHS_KEY, COOKIECUTTER_TEMPLATES_DIR)
    }

    pub fn simple_template_resolver(&self) -> Result<TemplateResolver> {
        Ok(TemplateResolver::new(self.simple_template_paths()?))
    }

    pub fn cookiecutter_template_resolver(&self) -> Result<TemplateResolver> {
        Ok(TemplateResolver::new(self.cookiecutter_template_paths()?))
    }
}

/// Collapses `.` and `..` without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(normalize_lexically(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_lexically(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_lexically(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize_lexically(Path::new("a/..")), PathBuf::from("."));
    }
}
