//! Cookiecutter templates: a directory tree rendered with a `cookiecutter` context.
//!
//! The template directory holds `cookiecutter.json` with the variables and their defaults, and a
//! single project directory such as `{{cookiecutter.app_name}}` whose paths and file contents
//! are rendered.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use log::{debug, info};
use walkdir::WalkDir;

use crate::constants::{COOKIECUTTER_FILE, COOKIECUTTER_PROCESS_COMMAND};
use crate::error::{Error, Result};
use crate::materialize::{copy_file, materialize, write_file};
use crate::parser::Binding;
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::resolver::TemplateResolver;
use crate::template::{Manifest, Template};
use crate::variable::{Value, Variable};

/// Context key listing globs of files copied without rendering.
pub const COPY_WITHOUT_RENDER_KEY: &str = "_copy_without_render";

/// Namespace under which variables are visible to the templates.
pub const CONTEXT_NAMESPACE: &str = "cookiecutter";

pub struct CookiecutterTemplate {
    name: String,
    path: PathBuf,
    manifest: Manifest,
    renderer: MiniJinjaRenderer,
}

impl CookiecutterTemplate {
    /// Resolves `name` and loads its optional `ccx.yml`.
    pub fn new(name: &str, resolver: &TemplateResolver) -> Result<Self> {
        let path = resolver.get_path(name)?;
        let manifest = Manifest::load(&path)?;
        Ok(Self { name: name.to_string(), path, manifest, renderer: MiniJinjaRenderer::new() })
    }

    /// Reads `cookiecutter.json`, keeping its key order.
    ///
    /// # Errors
    /// * `Error::InvalidTemplateError` if the file is missing
    /// * `Error::JsonError` if it isn't a JSON object
    pub fn cookiecutter_data(&self) -> Result<IndexMap<String, Option<Value>>> {
        let data_path = self.path.join(COOKIECUTTER_FILE);
        if !data_path.exists() {
            return Err(Error::InvalidTemplateError(format!(
                "Invalid template directory, '{COOKIECUTTER_FILE}' file not found."
            )));
        }

        let raw: IndexMap<String, serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&data_path)?)?;
        Ok(raw.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect())
    }

    /// Resolves the binding into the values templates see.
    ///
    /// Variables are resolved in order, so a default may refer to the variables before it.
    /// Lists are choices and resolve to their first entry; names starting with `_` stay raw.
    pub fn build_context(
        &self,
        binding: &Binding,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        let mut context = serde_json::Map::new();

        for (key, value) in binding {
            let resolved = if key.starts_with('_') {
                serde_json::to_value(value)?
            } else {
                let current = namespaced(&context);
                match value {
                    Value::List(choices) => match choices.first() {
                        Some(first) => self.render_value(first, &current)?,
                        None => serde_json::Value::Array(Vec::new()),
                    },
                    other => self.render_value(other, &current)?,
                }
            };
            context.insert(key.clone(), resolved);
        }

        Ok(context)
    }

    fn render_value(
        &self,
        value: &Value,
        context: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        match value {
            Value::String(s) => Ok(serde_json::Value::String(self.renderer.render(s, context)?)),
            Value::List(items) => Ok(serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| self.render_value(item, context))
                    .collect::<Result<_>>()?,
            )),
            Value::Dictionary(entries) => {
                let mut rendered = serde_json::Map::new();
                for (k, v) in entries {
                    rendered.insert(k.clone(), self.render_value(v, context)?);
                }
                Ok(serde_json::Value::Object(rendered))
            }
            Value::Boolean(_) | Value::Number(_) => Ok(serde_json::to_value(value)?),
        }
    }

    /// The templated project directory, e.g. `{{cookiecutter.app_name}}`.
    pub fn project_dir(&self) -> Result<PathBuf> {
        let mut candidates = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir()
                && name.contains(CONTEXT_NAMESPACE)
                && name.contains("{{")
                && name.contains("}}")
            {
                candidates.push(entry.path());
            }
        }
        candidates.sort();
        candidates.into_iter().next().ok_or_else(|| {
            Error::InvalidTemplateError(format!(
                "Non templated input dir in {}",
                self.path.display()
            ))
        })
    }

    /// Globs, relative to the project directory, of files copied without rendering.
    fn copy_without_render(
        &self,
        context: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        if let Some(patterns) = context.get(COPY_WITHOUT_RENDER_KEY).and_then(|v| v.as_array()) {
            for pattern in patterns.iter().filter_map(|p| p.as_str()) {
                builder.add(Glob::new(pattern).map_err(|e| {
                    Error::InvalidTemplateError(format!(
                        "{COPY_WITHOUT_RENDER_KEY} loading failed: {e}"
                    ))
                })?);
            }
        }
        builder.build().map_err(|e| {
            Error::InvalidTemplateError(format!("{COPY_WITHOUT_RENDER_KEY} loading failed: {e}"))
        })
    }

    /// Renders the project tree into `staging`.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Rendered project directory name, relative to `staging`
    pub fn generate(
        &self,
        context: &serde_json::Map<String, serde_json::Value>,
        staging: &Path,
    ) -> Result<PathBuf> {
        let project_dir = self.project_dir()?;
        let copy_only = self.copy_without_render(context)?;
        let render_context = namespaced(context);
        let mut project_name = None;

        for entry in WalkDir::new(&project_dir).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let path = entry.path();
            let relative = path
                .strip_prefix(&self.path)
                .ok()
                .and_then(|p| p.to_str())
                .ok_or_else(|| {
                    Error::InvalidTemplateError(format!("Invalid path {}", path.display()))
                })?;

            let rendered = self.renderer.render(relative, &render_context)?;
            if entry.depth() == 0 {
                if rendered.trim().is_empty() {
                    return Err(Error::InvalidTemplateError(format!(
                        "Project directory {relative} renders to an empty name"
                    )));
                }
                project_name = Some(PathBuf::from(&rendered));
            } else if !is_rendered_path_valid(&rendered) {
                debug!("Skipping {} as it renders to '{}'", relative, rendered);
                continue;
            }

            let target = staging.join(&rendered);
            debug!("Processing {} -> {}", relative, target.display());

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else if copy_only.is_match(path.strip_prefix(&project_dir).unwrap_or(path)) {
                copy_file(path, &target)?;
            } else {
                match fs::read_to_string(path) {
                    Ok(content) => {
                        let content = self.renderer.render(&content, &render_context)?;
                        write_file(&content, &target)?;
                        fs::set_permissions(&target, fs::metadata(path)?.permissions())?;
                    }
                    // Binary files are copied as they are
                    Err(e) if e.kind() == io::ErrorKind::InvalidData => copy_file(path, &target)?,
                    Err(e) => return Err(e.into()),
                }
            }
        }

        project_name.ok_or_else(|| {
            Error::InvalidTemplateError(format!("Empty template {}", self.path.display()))
        })
    }
}

/// A rendered path is unusable when a conditional emptied one of its components.
pub fn is_rendered_path_valid(path: &str) -> bool {
    !path.trim().is_empty()
        && !path.starts_with('/')
        && !path.ends_with('/')
        && !path.contains("//")
}

/// Wraps resolved variables as `{"cookiecutter": {...}}`.
fn namespaced(context: &serde_json::Map<String, serde_json::Value>) -> serde_json::Value {
    let mut root = serde_json::Map::new();
    root.insert(CONTEXT_NAMESPACE.to_string(), serde_json::Value::Object(context.clone()));
    serde_json::Value::Object(root)
}

impl Template for CookiecutterTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Every entry of `cookiecutter.json` is an optional variable with its value as default.
    fn variables(&self) -> Result<Vec<Variable>> {
        self.cookiecutter_data()?
            .into_iter()
            .map(|(name, default)| Variable::new(name, false, default, None))
            .collect()
    }

    fn cli_command(&self) -> &'static str {
        COOKIECUTTER_PROCESS_COMMAND
    }

    /// Generates into a staging directory, then materializes into `output_dir`.
    fn process(&self, binding: &Binding, output_dir: &Path, overwrite: bool) -> Result<()> {
        let context = self.build_context(binding)?;
        let staging = tempfile::tempdir()?;
        let project = self.generate(&context, staging.path())?;

        let destination = output_dir.join(&project);
        if destination.exists() && !overwrite {
            return Err(Error::DestinationExistsError {
                kind: "directory",
                path: destination.display().to_string(),
            });
        }

        info!("Applying template {} in {}", self.name, output_dir.display());
        let report = materialize(staging.path(), output_dir)?;
        info!(
            "{} created, {} unchanged, {} replaced",
            report.created.len(),
            report.unchanged.len(),
            report.replaced.len()
        );
        Ok(())
    }
}
