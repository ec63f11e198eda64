//! Template manifests and the behaviour shared by every template kind.
//!
//! A template directory may carry a `ccx.yml` manifest with a description, a post generation
//! note and, for simple templates, the variable declarations and file list.

use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::constants::MANIFEST_FILE;
use crate::doc::TemplateDoc;
use crate::error::{Error, Result};
use crate::parser::{ArgumentParser, Binding};
use crate::variable::{Value, Variable};

/// Contents of `ccx.yml`.
#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub post_gen: Option<String>,
    pub variables: Option<IndexMap<String, VariableDecl>>,
    #[serde(default)]
    pub files: Vec<FileSpec>,
}

/// A variable entry of the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VariableDecl {
    /// `{ required, default, type }` mapping
    Attributes(VariableAttributes),
    /// Bare example value: optional, type inferred
    Example(Option<Value>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableAttributes {
    #[serde(default)]
    pub required: bool,
    pub default: Option<Value>,
    #[serde(rename = "type")]
    pub var_type: Option<String>,
}

impl VariableDecl {
    pub fn into_variable(self, name: &str) -> Result<Variable> {
        match self {
            VariableDecl::Attributes(attrs) => Variable::declare(
                name,
                attrs.required,
                attrs.default,
                attrs.var_type.as_deref(),
            ),
            VariableDecl::Example(value) => Variable::new(name, false, value, None),
        }
    }
}

/// A file produced by a simple template.
#[derive(Debug, Clone, Deserialize)]
pub struct FileSpec {
    /// Template file, relative to the template directory
    pub name: String,
    /// Output path template
    pub output: String,
    #[serde(default)]
    pub executable: bool,
}

impl Manifest {
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| Error::InvalidTemplateError(format!("Invalid {MANIFEST_FILE}: {e}")))
    }

    /// Loads `ccx.yml` from a template directory; an absent file is an empty manifest.
    pub fn load<P: AsRef<Path>>(template_dir: P) -> Result<Self> {
        let path = template_dir.as_ref().join(MANIFEST_FILE);
        if !path.exists() {
            debug!("No {} in {}", MANIFEST_FILE, template_dir.as_ref().display());
            return Ok(Self::default());
        }

        debug!("Loading manifest from {}", path.display());
        Self::parse(&std::fs::read_to_string(&path)?)
    }

    /// Declared variables, in manifest order.
    ///
    /// # Errors
    /// * `Error::InvalidTemplateError` if the manifest declares no variables
    /// * `Error::TypeInferenceError` for a declaration without a resolvable type
    pub fn variables(&self) -> Result<Vec<Variable>> {
        let Some(declarations) = &self.variables else {
            return Err(Error::InvalidTemplateError(
                "Template without variables; just copy the files.".to_string(),
            ));
        };

        declarations
            .iter()
            .map(|(name, decl)| decl.clone().into_variable(name))
            .collect()
    }
}

/// Behaviour shared by simple and cookiecutter templates.
pub trait Template {
    /// Template name as listed by its resolver.
    fn name(&self) -> &str;

    /// Template directory.
    fn path(&self) -> &Path;

    /// Parsed `ccx.yml` of the template.
    fn manifest(&self) -> &Manifest;

    /// Variables the template declares, in declaration order.
    fn variables(&self) -> Result<Vec<Variable>>;

    /// Command that processes this kind of template.
    fn cli_command(&self) -> &'static str;

    /// Writes the template output for a binding into `output_dir`.
    fn process(&self, binding: &Binding, output_dir: &Path, overwrite: bool) -> Result<()>;

    fn argument_parser(&self) -> Result<ArgumentParser> {
        ArgumentParser::from_variables(&self.variables()?)
    }

    /// Binds raw command-line tokens against the template's variables.
    fn parse_arguments(&self, tokens: &[String]) -> Result<Binding> {
        self.argument_parser()?.bind(tokens)
    }

    fn doc(&self) -> Result<TemplateDoc> {
        let manifest = self.manifest();
        Ok(TemplateDoc::new(self.name(), self.cli_command())
            .description(manifest.description.clone().unwrap_or_default())
            .variables(self.variables()?)
            .post_gen(manifest.post_gen.clone()))
    }

    /// Binds the tokens and processes the template.
    fn apply(&self, tokens: &[String], output_dir: &Path, overwrite: bool) -> Result<()> {
        let binding = self.parse_arguments(tokens)?;
        self.process(&binding, output_dir, overwrite)
    }
}
