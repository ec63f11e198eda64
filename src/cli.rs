//! Command-line interface implementation for ccx.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, Args as ClapArgs, CommandFactory, Parser, Subcommand};

/// Command-line arguments structure for ccx.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ccx: generate files and projects from simple and cookiecutter templates",
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Simple templates: a flat set of rendered files
    Simple {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Cookiecutter templates: a rendered project tree
    #[command(name = "cc")]
    Cookiecutter {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Create the configuration file and an example template
    QuickStart {
        #[command(subcommand)]
        action: QuickStartAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// List available templates
    List,

    /// Show a template's variables and an example invocation
    Doc(DocArgs),

    /// Generate output from a template
    Process(ProcessArgs),
}

#[derive(ClapArgs, Debug)]
pub struct DocArgs {
    /// Template name
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Include templated defaults in the example invocation
    #[arg(short, long)]
    pub all_arguments: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ProcessArgs {
    /// Template name
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Overwrite existing files
    #[arg(short = 'w', long)]
    pub overwrite: bool,

    /// Template variables, e.g. `--class_name Foo`
    #[arg(
        value_name = "VARIABLES",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..
    )]
    pub variables: Vec<String>,
}

/// Spellings of the overwrite flag accepted among the variable tokens.
const OVERWRITE_FLAGS: [&str; 2] = ["-w", "--overwrite"];

impl ProcessArgs {
    /// Moves `-w`/`--overwrite` found among the variable tokens into `overwrite`.
    ///
    /// Clap stops looking for options once the variables start, so a flag appended after a pasted
    /// example invocation would otherwise be bound as a template variable. Tokens after `--` are
    /// left alone.
    pub fn extract_overwrite(mut self) -> Self {
        let end = self.variables.iter().position(|t| t == "--").unwrap_or(self.variables.len());
        let before = self.variables.len();

        let mut index = 0;
        self.variables.retain(|token| {
            let keep = index >= end || !OVERWRITE_FLAGS.contains(&token.as_str());
            index += 1;
            keep
        });

        self.overwrite |= self.variables.len() != before;
        self
    }
}

#[derive(Subcommand, Debug)]
pub enum QuickStartAction {
    /// Write a sample configuration file
    Config,

    /// Write the `cpp` example simple template
    ExampleTemplate,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::MissingSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
