//! Human-readable template documentation.
//!
//! The `Run` section holds an example invocation built by inverting the grammar of
//! [`crate::parser::ArgumentParser`]: feeding its tokens back to the parser binds every listed
//! variable.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::variable::{VarType, Variable};

/// Placeholder printed for values the user must provide.
pub const VALUE_PLACEHOLDER: &str = "<value>";

/// Placeholder printed for booleans without a default.
pub const BOOLEAN_PLACEHOLDER: &str = "<true/false>";

/// Characters a token may contain and still be pasted into a shell unquoted.
const SHELL_SAFE: &str = "@%+=:,./_-";

/// Content of a documentation section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Text(String),
    Items(Vec<String>),
}

/// Formats sections as a header, a dashed rule of the same width and the content.
pub fn format_sections(sections: &[(String, SectionContent)]) -> String {
    let mut msg = String::new();
    for (header, content) in sections {
        let content = match content {
            SectionContent::Text(text) => text.clone(),
            // An empty list still renders its bullet marker
            SectionContent::Items(items) if items.is_empty() => "-".to_string(),
            SectionContent::Items(items) => format!("- {}", items.join("\n- ")),
        };

        msg.push('\n');
        msg.push_str(header);
        msg.push('\n');
        msg.push_str(&"-".repeat(header.chars().count()));
        msg.push('\n');
        msg.push_str(content.trim_end());
        msg.push('\n');
    }
    msg
}

/// Documentation of a single template.
#[derive(Debug, Clone)]
pub struct TemplateDoc {
    pub name: String,
    pub cli_command: String,
    pub description: String,
    pub variables: Vec<Variable>,
    pub post_gen: Option<String>,
}

impl TemplateDoc {
    pub fn new<S: Into<String>>(name: S, cli_command: S) -> Self {
        Self {
            name: name.into(),
            cli_command: cli_command.into(),
            description: String::new(),
            variables: Vec::new(),
            post_gen: None,
        }
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn post_gen<S: Into<String>>(mut self, post_gen: Option<S>) -> Self {
        self.post_gen = post_gen.map(Into::into);
        self
    }

    /// Renders the `{name}`, `Variables`, `Run` and, when present, `Post generation action`
    /// sections.
    ///
    /// # Errors
    /// * `Error::CommandGenerationError` if a variable type can't be shown as a flag value
    pub fn render(&self, show_all: bool) -> Result<String> {
        let mut sections = vec![
            (self.name.clone(), SectionContent::Text(self.description.clone())),
            ("Variables".to_string(), SectionContent::Items(self.variable_items())),
            ("Run".to_string(), SectionContent::Text(self.generate_command(show_all)?)),
        ];

        if let Some(post_gen) = self.post_gen.as_deref().filter(|p| !p.is_empty()) {
            sections.push((
                "Post generation action".to_string(),
                SectionContent::Text(post_gen.to_string()),
            ));
        }

        Ok(format_sections(&sections))
    }

    fn variable_items(&self) -> Vec<String> {
        self.variables
            .iter()
            .filter(|v| !v.is_internal())
            .map(|v| match (v.required(), v.default()) {
                (true, _) => format!("{} (required)", v.name()),
                (false, Some(default)) => format!("{} (default: {})", v.name(), default),
                (false, None) => format!("{} (optional {})", v.name(), v.var_type()),
            })
            .collect()
    }

    /// Indented example invocation: `{cli_command} {name} {args}`.
    pub fn generate_command(&self, show_all: bool) -> Result<String> {
        let args = generate_args(&self.variables, show_all)?;
        let command = format!("    {} {} {}", self.cli_command, self.name, args);
        Ok(command.trim_end().to_string())
    }
}

/// Renders the documentation of a template.
///
/// # Arguments
/// * `name` - Template name
/// * `description` - Template description, may be empty
/// * `variables` - Declared variables, in declaration order
/// * `cli_command` - Command that processes the template, e.g. `ccx simple process`
/// * `post_gen` - Message describing what to do after generation
/// * `show_all` - Include variables whose defaults are template expressions
pub fn render_doc(
    name: &str,
    description: &str,
    variables: &[Variable],
    cli_command: &str,
    post_gen: Option<&str>,
    show_all: bool,
) -> Result<String> {
    TemplateDoc::new(name, cli_command)
        .description(description)
        .variables(variables.to_vec())
        .post_gen(post_gen)
        .render(show_all)
}

/// Builds the shell-quoted flag tokens of an example invocation.
///
/// List and dictionary variables are left out. Optional strings whose default contains `{{` are
/// template expressions, not literal input, and only appear when `show_all` is set.
///
/// # Errors
/// * `Error::CommandGenerationError` if a list or dictionary reaches value generation
pub fn generate_args(variables: &[Variable], show_all: bool) -> Result<String> {
    let mut args: Vec<String> = Vec::new();

    for v in variables {
        if matches!(v.var_type(), VarType::List | VarType::Dictionary) {
            continue;
        }

        if v.required() {
            args.push(format!("--{}", v.name()));
            args.push(
                v.default()
                    .map_or_else(|| VALUE_PLACEHOLDER.to_string(), ToString::to_string),
            );
            continue;
        }

        let arg = match v.var_type() {
            VarType::String | VarType::Number => match v.default() {
                None => VALUE_PLACEHOLDER.to_string(),
                Some(default) => {
                    let text = default.to_string();
                    if text.contains("{{") && !show_all {
                        continue;
                    }
                    text
                }
            },
            VarType::Boolean => match v.default() {
                None => BOOLEAN_PLACEHOLDER.to_string(),
                Some(default) => default.to_string().to_lowercase(),
            },
            other @ (VarType::List | VarType::Dictionary) => {
                return Err(Error::CommandGenerationError { var_type: other.to_string() })
            }
        };

        args.push(format!("--{}", v.name()));
        args.push(arg);
    }

    Ok(args
        .iter()
        .map(|arg| quote(arg).into_owned())
        .collect::<Vec<_>>()
        .join(" "))
}

/// Single-quotes a token unless it is non-empty and made only of ASCII alphanumerics and
/// [`SHELL_SAFE`] characters, so braces, `!` and non-ASCII text never reach the shell bare.
pub fn quote(token: &str) -> Cow<'_, str> {
    let safe = |c: char| c.is_ascii_alphanumeric() || SHELL_SAFE.contains(c);
    if !token.is_empty() && token.chars().all(safe) {
        return Cow::Borrowed(token);
    }
    Cow::Owned(format!("'{}'", token.replace('\'', r#"'"'"'"#)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sections_rule_matches_header() {
        let out = format_sections(&[(
            "python-package".to_string(),
            SectionContent::Text("desc  \n".to_string()),
        )]);
        assert_eq!(out, "\npython-package\n--------------\ndesc\n");
    }

    #[test]
    fn test_format_sections_items() {
        let out = format_sections(&[(
            "Variables".to_string(),
            SectionContent::Items(vec!["a (required)".to_string(), "b (default: x)".to_string()]),
        )]);
        assert_eq!(out, "\nVariables\n---------\n- a (required)\n- b (default: x)\n");
    }

    #[test]
    fn test_format_sections_empty_items() {
        let out = format_sections(&[("Variables".to_string(), SectionContent::Items(vec![]))]);
        assert_eq!(out, "\nVariables\n---------\n-\n");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("run.sh"), "run.sh");
        assert_eq!(quote("a@b%c+d=e:f,g/h_i-j"), "a@b%c+d=e:f,g/h_i-j");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("x{b,c}"), "'x{b,c}'");
        assert_eq!(quote("hi!"), "'hi!'");
        assert_eq!(quote("héllo"), "'héllo'");
        assert_eq!(quote("it's"), r#"'it'"'"'s'"#);
    }
}
