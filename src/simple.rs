//! Simple templates: a flat set of files described by `ccx.yml`.
//!
//! ```yaml
//! name: bash
//! description: Create a bash script
//! variables:
//!   filename:
//!     default: run.sh
//! files:
//!   - name: bash_script.sh
//!     output: "{{ filename }}"
//!     executable: true
//! ```

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::constants::SIMPLE_PROCESS_COMMAND;
use crate::error::{Error, Result};
use crate::materialize::{make_executable, write_file};
use crate::parser::Binding;
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::resolver::TemplateResolver;
use crate::template::{Manifest, Template};
use crate::variable::Variable;

pub struct SimpleTemplate {
    name: String,
    path: PathBuf,
    manifest: Manifest,
    renderer: MiniJinjaRenderer,
}

/// A rendered file waiting to be written.
struct RenderedFile {
    target: PathBuf,
    content: String,
    executable: bool,
}

impl SimpleTemplate {
    /// Resolves `name` and loads its manifest.
    ///
    /// # Errors
    /// * `Error::TemplateNotFoundError` if the resolver doesn't know the template
    /// * `Error::InvalidTemplateError` if `ccx.yml` is malformed
    pub fn new(name: &str, resolver: &TemplateResolver) -> Result<Self> {
        let path = resolver.get_path(name)?;
        let manifest = Manifest::load(&path)?;
        Ok(Self { name: name.to_string(), path, manifest, renderer: MiniJinjaRenderer::new() })
    }

    fn render_files(
        &self,
        context: &serde_json::Value,
        output_dir: &Path,
    ) -> Result<Vec<RenderedFile>> {
        let mut rendered = Vec::with_capacity(self.manifest.files.len());
        for file in &self.manifest.files {
            let output = self.renderer.render(&file.output, context)?;
            // Conditional outputs may render to nothing
            if output.trim().is_empty() {
                debug!("Skipping {} as its output path is empty", file.name);
                continue;
            }
            let output = PathBuf::from(output);
            let target = if output.is_absolute() { output } else { output_dir.join(output) };

            let source = self.path.join(&file.name);
            let template = std::fs::read_to_string(&source).map_err(|e| {
                Error::InvalidTemplateError(format!(
                    "Unable to read template file {}: {}",
                    source.display(),
                    e
                ))
            })?;
            let content = self.renderer.render(&template, context)?;

            rendered.push(RenderedFile { target, content, executable: file.executable });
        }
        Ok(rendered)
    }
}

impl Template for SimpleTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn variables(&self) -> Result<Vec<Variable>> {
        self.manifest.variables()
    }

    fn cli_command(&self) -> &'static str {
        SIMPLE_PROCESS_COMMAND
    }

    /// Renders every file first and only writes once no target collides.
    fn process(&self, binding: &Binding, output_dir: &Path, overwrite: bool) -> Result<()> {
        let context = serde_json::to_value(binding)?;
        let rendered = self.render_files(&context, output_dir)?;

        if !overwrite {
            if let Some(existing) = rendered.iter().find(|f| f.target.exists()) {
                return Err(Error::DestinationExistsError {
                    kind: "file",
                    path: existing.target.display().to_string(),
                });
            }
        }

        for file in rendered {
            info!("Writing {}", file.target.display());
            write_file(&file.content, &file.target)?;
            if file.executable {
                make_executable(&file.target)?;
            }
        }
        Ok(())
    }
}
