//! Finds templates by name across a list of search directories.

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use log::warn;

use crate::error::{Error, Result};

/// Maps template names to directories.
///
/// Every entry of every search path is a template; earlier search paths take precedence.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    paths: Vec<PathBuf>,
}

impl TemplateResolver {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn entries(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut out = Vec::new();
        for path in &self.paths {
            if !path.exists() {
                warn!("Template source path {} not found; skipping", path.display());
                continue;
            }

            let mut found = Vec::new();
            for entry in fs::read_dir(path)? {
                let entry = entry?;
                found.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
            }
            found.sort();
            out.extend(found);
        }
        Ok(out)
    }

    /// All templates found, name to path; the first occurrence of a name wins.
    pub fn list(&self) -> Result<IndexMap<String, PathBuf>> {
        let mut templates = IndexMap::new();
        for (name, path) in self.entries()? {
            templates.entry(name).or_insert(path);
        }
        Ok(templates)
    }

    /// # Errors
    /// * `Error::TemplateNotFoundError` if no search path contains `name`
    pub fn get_path(&self, name: &str) -> Result<PathBuf> {
        self.entries()?
            .into_iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, path)| path)
            .ok_or_else(|| Error::TemplateNotFoundError { name: name.to_string() })
    }
}
