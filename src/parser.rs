//! Command-line grammar generated from a template's variables.
//!
//! Every variable becomes a `--name VALUE` flag. The grammar is assembled with
//! [`ArgumentParserBuilder`] once the template manifest is known and then compiled into an
//! [`ArgumentParser`] that binds raw tokens in a single pass.

use std::sync::LazyLock;

use indexmap::IndexMap;
use log::debug;
use regex::Regex;

use crate::error::{Error, Result};
use crate::variable::{Value, VarType, Variable};

/// Values bound to each variable name, in declaration order.
///
/// Every supplied flag and every flag with a default is present. An optional variable that has
/// neither a default nor a supplied value is absent rather than bound to a null, so templates see
/// it as undefined.
pub type Binding = IndexMap<String, Value>;

/// Converts the raw text given for a flag into a bound value.
pub type Coercion = fn(&str) -> Value;

const TRUTHY: [&str; 5] = ["true", "t", "yes", "y", "1"];

static NEGATIVE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\d+$|^-\d*\.\d+$").expect("Invalid negative number regex"));

/// Case-insensitive boolean coercion; anything outside the truthy set is false.
pub fn truthy(raw: &str) -> Value {
    let raw = raw.to_lowercase();
    Value::Boolean(TRUTHY.contains(&raw.as_str()))
}

/// Keeps the raw text as a string value.
pub fn verbatim(raw: &str) -> Value {
    Value::String(raw.to_string())
}

/// Specification of a single `--name` flag.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    pub name: String,
    pub required: bool,
    pub default: Option<Value>,
    pub coerce: Coercion,
}

impl FlagSpec {
    /// Derives the flag for a variable.
    ///
    /// Required flags carry no default. Boolean flags coerce through [`truthy`] and fall back to
    /// `false` when the variable has no default.
    pub fn from_variable(variable: &Variable) -> Self {
        let is_boolean = variable.var_type() == VarType::Boolean;
        let default = if variable.required() {
            None
        } else if is_boolean {
            Some(variable.default().cloned().unwrap_or(Value::Boolean(false)))
        } else {
            variable.default().cloned()
        };

        Self {
            name: variable.name().to_string(),
            required: variable.required(),
            default,
            coerce: if is_boolean { truthy } else { verbatim },
        }
    }

    fn flag(&self) -> String {
        format!("--{}", self.name)
    }
}

/// Accumulates flag specifications before compiling them into a parser.
#[derive(Debug, Default)]
pub struct ArgumentParserBuilder {
    flags: Vec<FlagSpec>,
}

impl ArgumentParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(mut self, spec: FlagSpec) -> Self {
        self.flags.push(spec);
        self
    }

    pub fn variable(self, variable: &Variable) -> Self {
        self.flag(FlagSpec::from_variable(variable))
    }

    pub fn variables<'a, I>(self, variables: I) -> Self
    where
        I: IntoIterator<Item = &'a Variable>,
    {
        variables.into_iter().fold(self, |builder, v| builder.variable(v))
    }

    /// Compiles the accumulated flags.
    ///
    /// # Errors
    /// * `Error::DuplicateVariableError` if two flags share a name
    pub fn build(self) -> Result<ArgumentParser> {
        let mut flags = IndexMap::with_capacity(self.flags.len());
        for spec in self.flags {
            if flags.contains_key(&spec.name) {
                return Err(Error::DuplicateVariableError { name: spec.name });
            }
            flags.insert(spec.name.clone(), spec);
        }
        Ok(ArgumentParser { flags })
    }
}

/// Compiled grammar for one template invocation.
#[derive(Debug)]
pub struct ArgumentParser {
    flags: IndexMap<String, FlagSpec>,
}

impl ArgumentParser {
    pub fn builder() -> ArgumentParserBuilder {
        ArgumentParserBuilder::new()
    }

    /// Builds the grammar for an ordered collection of variables.
    pub fn from_variables(variables: &[Variable]) -> Result<Self> {
        Self::builder().variables(variables).build()
    }

    pub fn flags(&self) -> impl Iterator<Item = &FlagSpec> {
        self.flags.values()
    }

    /// Binds raw command-line tokens.
    ///
    /// Accepts `--name value` and `--name=value`; a repeated flag keeps its last value.
    ///
    /// # Returns
    /// * `Result<Binding>` - Value of every flag that was supplied or has a default, keyed by
    ///   variable name
    ///
    /// # Errors
    /// * `Error::ArgumentBindingError` for a flag without a value, missing required flags or
    ///   unrecognized tokens, checked in that order
    pub fn bind<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Binding> {
        let mut supplied: IndexMap<&str, String> = IndexMap::new();
        let mut unrecognized: Vec<&str> = Vec::new();

        let mut iter = tokens.iter().map(|t| t.as_ref()).peekable();
        while let Some(token) = iter.next() {
            if token == "--" {
                unrecognized.extend(iter.by_ref());
                break;
            }

            let Some(flag) = token.strip_prefix("--") else {
                unrecognized.push(token);
                continue;
            };

            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (flag, None),
            };

            let Some(spec) = self.flags.get(name) else {
                unrecognized.push(token);
                continue;
            };

            let value = match inline {
                Some(value) => value.to_string(),
                None => match iter.next_if(|next| !looks_like_flag(next)) {
                    Some(value) => value.to_string(),
                    None => {
                        return Err(Error::ArgumentBindingError(format!(
                            "argument {}: expected one argument",
                            spec.flag()
                        )))
                    }
                },
            };
            supplied.insert(spec.name.as_str(), value);
        }

        let missing: Vec<String> = self
            .flags
            .values()
            .filter(|spec| spec.required && !supplied.contains_key(spec.name.as_str()))
            .map(FlagSpec::flag)
            .collect();
        if !missing.is_empty() {
            return Err(Error::ArgumentBindingError(format!(
                "the following arguments are required: {}",
                missing.join(", ")
            )));
        }

        if !unrecognized.is_empty() {
            return Err(Error::ArgumentBindingError(format!(
                "unrecognized arguments: {}",
                unrecognized.join(" ")
            )));
        }

        let mut binding = Binding::with_capacity(self.flags.len());
        for spec in self.flags.values() {
            let value = match supplied.get(spec.name.as_str()) {
                Some(raw) => Some((spec.coerce)(raw)),
                None => spec.default.clone(),
            };
            if let Some(value) = value {
                binding.insert(spec.name.clone(), value);
            }
        }

        debug!("Bound {} of {} variables", binding.len(), self.flags.len());
        Ok(binding)
    }
}

/// Whether a token starts a new flag rather than being a value.
///
/// A lone `-`, negative numbers such as `-1` or `-.5`, and anything containing a space are values.
fn looks_like_flag(token: &str) -> bool {
    token.len() > 1
        && token.starts_with('-')
        && !token.contains(' ')
        && !NEGATIVE_NUMBER.is_match(token)
}
