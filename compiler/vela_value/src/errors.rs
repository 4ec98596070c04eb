//! Error types for evaluation.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` provides typed error categories for diagnostic conversion.
//! Factory functions (e.g., `missing_required_argument()`) are the public API;
//! they populate both `kind` and `message`.

use std::fmt;

use vela_ir::{Name, Span};

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category for structured diagnostics.
///
/// Each variant carries the context needed to report it: the function being
/// called, the argument involved, the allowed range or allowed value set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Argument binding
    /// More than one actual partially matches `formal`, or one actual
    /// partially matches several formals (the first of which is `formal`).
    AmbiguousPartialMatch {
        formal: String,
        actuals: Vec<String>,
    },
    MissingRequiredArgument {
        function: String,
        name: String,
    },
    UnmatchedNamedArgument {
        function: String,
        name: String,
    },
    ArityTooFew {
        function: String,
        min: usize,
        max: Option<usize>,
        got: usize,
    },
    ArityTooMany {
        function: String,
        min: usize,
        max: Option<usize>,
        got: usize,
    },
    ArgumentNotOneOf {
        arg: String,
        allowed: Vec<String>,
    },

    // Operands
    UnsupportedOperandType {
        op: String,
        description: String,
    },
    NotAScalar {
        arg: String,
    },
    UnexpectedMissingValue,
    TypeMismatch {
        expected: String,
        got: String,
    },

    // Scoping and calls
    UndefinedVariable {
        name: String,
    },
    NotCallable {
        type_name: String,
    },
    StackOverflow {
        depth: usize,
    },

    /// Catch-all for errors without a structured kind.
    Custom {
        message: String,
    },
}

struct ArityRange {
    min: usize,
    max: Option<usize>,
}

impl fmt::Display for ArityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
        match self.max {
            Some(max) if max == self.min => write!(f, "{max} {}", plural(max)),
            Some(max) => write!(f, "{} to {max} {}", self.min, plural(max)),
            None => write!(f, "at least {} {}", self.min, plural(self.min)),
        }
    }
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousPartialMatch { formal, actuals } => {
                if let [actual] = actuals.as_slice() {
                    write!(
                        f,
                        "argument \"{actual}\" matches multiple formal arguments, including \"{formal}\""
                    )
                } else {
                    write!(
                        f,
                        "formal argument \"{formal}\" matched by multiple actual arguments: {}",
                        quoted_list(actuals)
                    )
                }
            }
            Self::MissingRequiredArgument { function, name } => {
                write!(
                    f,
                    "argument \"{name}\" is missing, with no default (in call to {function})"
                )
            }
            Self::UnmatchedNamedArgument { function, name } => {
                write!(f, "unused argument ({name} = ...) in call to {function}")
            }
            Self::ArityTooFew {
                function,
                min,
                max,
                got,
            }
            | Self::ArityTooMany {
                function,
                min,
                max,
                got,
            } => {
                let range = ArityRange {
                    min: *min,
                    max: *max,
                };
                write!(f, "{function} expects {range}, got {got}")
            }
            Self::ArgumentNotOneOf { arg, allowed } => {
                write!(f, "'{arg}' should be one of {}", quoted_list(allowed))
            }
            Self::UnsupportedOperandType { op, description } => {
                write!(f, "operator `{op}` cannot be applied to {description}")
            }
            Self::NotAScalar { arg } => write!(f, "'{arg}' must be of length 1"),
            Self::UnexpectedMissingValue => write!(f, "missing value where a value is needed"),
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::UndefinedVariable { name } => write!(f, "object '{name}' not found"),
            Self::NotCallable { type_name } => {
                write!(f, "attempt to apply non-function ({type_name})")
            }
            Self::StackOverflow { depth } => {
                write!(f, "maximum recursion depth exceeded (limit: {depth})")
            }
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Additional context note attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    /// Create a note with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    /// Create a note with a message and source location.
    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Function name.
    pub name: String,
    /// Source location of the call site.
    pub span: Option<Span>,
}

/// Immutable snapshot of the call stack at an error site.
///
/// Captured from the evaluator's `CallStack`; innermost call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " at {span}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
    /// Source location where the error occurred.
    pub span: Option<Span>,
    /// Call stack at the error site, attached when the error leaves a call.
    pub backtrace: Option<EvalBacktrace>,
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    /// Create an error with just a message (`Custom` kind).
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    /// Create an error from a structured kind.
    ///
    /// The message is computed from the kind's `Display` impl.
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            backtrace: None,
            notes: Vec::new(),
        }
    }

    /// Attach a source span unless one is already set.
    ///
    /// The innermost location is the most precise, so outer call sites do
    /// not overwrite it.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    /// Attach a backtrace unless one is already set.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() {
            self.backtrace = Some(backtrace);
        }
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Argument binding errors

#[cold]
pub fn ambiguous_partial_match(formal: Name, actuals: &[Name]) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AmbiguousPartialMatch {
        formal: formal.as_str().to_string(),
        actuals: actuals.iter().map(|n| n.as_str().to_string()).collect(),
    })
}

#[cold]
pub fn missing_required_argument(function: Name, name: Name) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingRequiredArgument {
        function: function.as_str().to_string(),
        name: name.as_str().to_string(),
    })
}

#[cold]
pub fn unmatched_named_argument(function: Name, name: Name) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnmatchedNamedArgument {
        function: function.as_str().to_string(),
        name: name.as_str().to_string(),
    })
}

#[cold]
pub fn arity_too_few(function: Name, min: usize, max: Option<usize>, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityTooFew {
        function: function.as_str().to_string(),
        min,
        max,
        got,
    })
}

#[cold]
pub fn arity_too_many(function: Name, min: usize, max: Option<usize>, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityTooMany {
        function: function.as_str().to_string(),
        min,
        max,
        got,
    })
}

#[cold]
pub fn argument_not_one_of(arg: &str, allowed: &[&str]) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArgumentNotOneOf {
        arg: arg.to_string(),
        allowed: allowed.iter().map(ToString::to_string).collect(),
    })
}

// Operand errors

#[cold]
pub fn unsupported_operand_type(op: &str, description: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedOperandType {
        op: op.to_string(),
        description: description.to_string(),
    })
}

#[cold]
pub fn not_a_scalar(arg: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAScalar {
        arg: arg.to_string(),
    })
}

#[cold]
pub fn unexpected_missing_value() -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnexpectedMissingValue)
}

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

// Scoping and call errors

#[cold]
pub fn undefined_variable(name: Name) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.as_str().to_string(),
    })
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

/// Maximum call depth exceeded.
#[cold]
pub fn recursion_limit_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth: limit })
}

#[cfg(test)]
mod tests;
