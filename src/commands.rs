//! Executes parsed command lines.

use std::path::Path;

use log::{debug, info};

use crate::cli::{Args, Commands, QuickStartAction, TemplateAction};
use crate::config::Config;
use crate::cookiecutter::CookiecutterTemplate;
use crate::error::Result;
use crate::quick_start::{generate_config, generate_example_template};
use crate::resolver::TemplateResolver;
use crate::simple::SimpleTemplate;
use crate::template::Template;

/// Template kind selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Simple,
    Cookiecutter,
}

impl TemplateKind {
    pub fn resolver(&self, config: &Config) -> Result<TemplateResolver> {
        match self {
            TemplateKind::Simple => config.simple_template_resolver(),
            TemplateKind::Cookiecutter => config.cookiecutter_template_resolver(),
        }
    }

    /// Loads the named template of this kind.
    pub fn load(&self, name: &str, config: &Config) -> Result<Box<dyn Template>> {
        let resolver = self.resolver(config)?;
        let template: Box<dyn Template> = match self {
            TemplateKind::Simple => Box::new(SimpleTemplate::new(name, &resolver)?),
            TemplateKind::Cookiecutter => Box::new(CookiecutterTemplate::new(name, &resolver)?),
        };
        Ok(template)
    }
}

/// Runs the command with the configuration from the user's home directory.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    run_with_config(args, &config, Path::new("."))
}

/// Runs the command against an explicit configuration, generating into `output_dir`.
///
/// # Returns
/// * `Result<()>` - Success or the first error encountered
pub fn run_with_config(args: Args, config: &Config, output_dir: &Path) -> Result<()> {
    match args.command {
        Commands::Simple { action } => {
            run_template_action(TemplateKind::Simple, action, config, output_dir)
        }
        Commands::Cookiecutter { action } => {
            run_template_action(TemplateKind::Cookiecutter, action, config, output_dir)
        }
        Commands::QuickStart { action } => match action {
            QuickStartAction::Config => generate_config(config).map(|_| ()),
            QuickStartAction::ExampleTemplate => {
                if let Some(dir) = generate_example_template(config)? {
                    info!("Example template written to {}", dir.display());
                }
                Ok(())
            }
        },
    }
}

fn run_template_action(
    kind: TemplateKind,
    action: TemplateAction,
    config: &Config,
    output_dir: &Path,
) -> Result<()> {
    match action {
        TemplateAction::List => {
            for name in kind.resolver(config)?.list()?.keys() {
                println!("{name}");
            }
            Ok(())
        }
        TemplateAction::Doc(doc) => {
            let template = kind.load(&doc.template, config)?;
            print!("{}", template.doc()?.render(doc.all_arguments)?);
            Ok(())
        }
        TemplateAction::Process(process) => {
            let process = process.extract_overwrite();
            let template = kind.load(&process.template, config)?;
            debug!("Processing {} with {:?}", template.path().display(), process.variables);
            template.apply(&process.variables, output_dir, process.overwrite)?;
            if let Some(post_gen) = template.manifest().post_gen.as_deref() {
                if !post_gen.trim().is_empty() {
                    info!("Post generation action:\n{}", post_gen.trim_end());
                }
            }
            Ok(())
        }
    }
}
