use std::fmt;

/// Error codes for evaluation diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E6xxx: Runtime (binding, coercion, scoping) errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Argument binding (E60xx)
    /// Partial argument name matches more than one formal, or a formal is
    /// matched by more than one partial name
    E6001,
    /// Required formal has no actual and no default
    E6002,
    /// Named actual could not be matched to a known formal
    E6003,
    /// Fewer actuals than the function's minimum arity
    E6004,
    /// More actuals than the function accepts
    E6005,
    /// Enumerated-choice argument is not one of the allowed values
    E6006,

    // Operands and coercion (E61xx)
    /// Operator applied to an operand kind it does not support
    E6101,
    /// Argument must have exactly one element
    E6102,
    /// Missing value where a definite value is required
    E6103,
    /// Operand has the wrong type
    E6104,

    // Scoping and calls (E62xx)
    /// Variable is not bound in any enclosing scope or the global table
    E6201,
    /// Value is not callable
    E6202,
    /// Maximum call depth exceeded
    E6203,

    // Internal (E9xxx)
    /// Uncategorized evaluation error
    E9001,
}

impl ErrorCode {
    /// Get the string representation (e.g., "E6001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6101 => "E6101",
            ErrorCode::E6102 => "E6102",
            ErrorCode::E6103 => "E6103",
            ErrorCode::E6104 => "E6104",
            ErrorCode::E6201 => "E6201",
            ErrorCode::E6202 => "E6202",
            ErrorCode::E6203 => "E6203",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Whether this code reports a call-binding failure (the call never ran).
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E6001
                | ErrorCode::E6002
                | ErrorCode::E6003
                | ErrorCode::E6004
                | ErrorCode::E6005
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
