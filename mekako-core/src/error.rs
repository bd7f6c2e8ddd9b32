//! Structured errors for the statistics core
//!
//! Errors never crash the caller. They are values that carry a machine
//! readable code, a message naming the offending argument, and an optional
//! suggestion the presentation layer can show verbatim.

use crate::SampleError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const COMPUTATION_ERROR: &str = "COMPUTATION_ERROR";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Coarse classification of an error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// A raw argument could not be converted to the required type
    Parse,
    /// A parsed value violates a precondition
    Domain,
    /// A numeric routine failed on nominally valid input
    Computation,
    /// The call itself was malformed (wrong name, wrong arity)
    Usage,
    /// A bug
    Internal,
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

/// Where an error occurred
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Function or command that raised the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    /// Argument that failed validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error returned by every fallible operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    pub severity: Severity,
}

impl StatError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set function context
    pub fn in_function(mut self, function: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.function = Some(function.into());
        self
    }

    /// Builder: set argument context
    pub fn for_argument(mut self, argument: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.argument = Some(argument.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Classify the error by its code
    pub fn kind(&self) -> ErrorKind {
        match self.code.as_str() {
            codes::PARSE_ERROR | codes::ARG_TYPE => ErrorKind::Parse,
            codes::DOMAIN_ERROR => ErrorKind::Domain,
            codes::COMPUTATION_ERROR => ErrorKind::Computation,
            codes::ARG_COUNT | codes::UNDEFINED_FUNC | codes::NOT_FOUND => ErrorKind::Usage,
            _ => ErrorKind::Internal,
        }
    }

    pub fn is_domain(&self) -> bool {
        self.kind() == ErrorKind::Domain
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }

    pub fn is_computation(&self) -> bool {
        self.kind() == ErrorKind::Computation
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Use plain decimal numbers separated by commas, e.g. 1.5,2,3")
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(
            codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got),
        )
        .in_function(func)
        .for_argument(arg)
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(
            codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got),
        )
        .with_suggestion(format!("Use help('{}') for usage", func))
        .in_function(func)
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }

    /// Domain error for a single argument: `func(): arg must be <rule>, got <value>`
    pub fn invalid_argument(func: &str, arg: &str, rule: &str, got: impl std::fmt::Display) -> Self {
        Self::domain_error(format!("{}(): {} must be {}, got {}", func, arg, rule, got))
            .in_function(func)
            .for_argument(arg)
    }

    pub fn computation_error(details: impl Into<String>) -> Self {
        Self::new(
            codes::COMPUTATION_ERROR,
            format!("Computation error: {}", details.into()),
        )
        .with_suggestion("The input is valid but numerically degenerate; check for constant or extreme data")
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use help() to list available functions")
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for StatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for StatError {}

impl From<SampleError> for StatError {
    fn from(err: SampleError) -> Self {
        let message = err.to_string();
        match err {
            SampleError::MissingLabel(_) => Self::parse_error(message)
                .with_suggestion("Write groups as label: x1,x2,... e.g. control: 1,2,3"),
            _ => Self::parse_error(message),
        }
    }
}
