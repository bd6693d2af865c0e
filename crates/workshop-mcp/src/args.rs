//! Tool arguments and their validation.
//!
//! Arguments arrive as the loosely-typed `params.arguments` object of a
//! `tools/call` request. Tools convert them once into their own parameter
//! struct through a [`Validator`], which collects every problem before
//! failing so the caller sees all missing or malformed fields at once.
//!
//! Optional parameters never fail: a value of the wrong JSON kind is treated
//! as absent and the tool falls back to its default.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ToolError;

/// Arguments of a single tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build arguments from the `arguments` member of `tools/call` params.
    ///
    /// Anything other than a JSON object yields an empty set.
    pub fn from_params(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String value of an optional parameter.
    pub fn optional_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Integer value of an optional parameter.
    pub fn optional_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(as_int)
    }

    pub fn validator(&self) -> Validator<'_> {
        Validator {
            args: self,
            problems: Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Integral JSON numbers, including floats without a fractional part.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// A single reason an argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentProblem {
    #[error("parameter '{0}' is required")]
    Missing(String),

    #[error("parameter '{0}' must not be empty")]
    Empty(String),

    #[error("parameter '{name}' must be a {expected}")]
    WrongType { name: String, expected: &'static str },
}

impl ArgumentProblem {
    /// Name of the offending parameter.
    pub fn parameter(&self) -> &str {
        match self {
            Self::Missing(name) | Self::Empty(name) | Self::WrongType { name, .. } => name,
        }
    }
}

/// Collects required-argument problems for one call.
///
/// Required accessors return a placeholder when the argument is unusable;
/// callers must check [`Validator::finish`] before using the values.
#[derive(Debug)]
pub struct Validator<'a> {
    args: &'a Arguments,
    problems: Vec<ArgumentProblem>,
}

impl Validator<'_> {
    /// Required non-empty string.
    pub fn required_str(&mut self, name: &str) -> String {
        let args = self.args;
        match args.get(name) {
            None | Some(Value::Null) => self.record(ArgumentProblem::Missing(name.to_string())),
            Some(Value::String(s)) if s.is_empty() => {
                self.record(ArgumentProblem::Empty(name.to_string()));
            }
            Some(Value::String(s)) => return s.clone(),
            Some(_) => self.record(ArgumentProblem::WrongType {
                name: name.to_string(),
                expected: "string",
            }),
        }
        String::new()
    }

    /// Required integral number.
    pub fn required_int(&mut self, name: &str) -> i64 {
        let args = self.args;
        match args.get(name) {
            None | Some(Value::Null) => self.record(ArgumentProblem::Missing(name.to_string())),
            Some(value) => match as_int(value) {
                Some(n) => return n,
                None => self.record(ArgumentProblem::WrongType {
                    name: name.to_string(),
                    expected: "number",
                }),
            },
        }
        0
    }

    fn record(&mut self, problem: ArgumentProblem) {
        self.problems.push(problem);
    }

    /// Fail with every recorded problem, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] when at least one required
    /// argument was missing or malformed.
    pub fn finish(self) -> Result<(), ToolError> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(ToolError::InvalidArguments(self.problems))
        }
    }
}
