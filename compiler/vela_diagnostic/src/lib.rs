//! Diagnostic records for the evaluation core.
//!
//! The core never renders errors. It converts each failure into a
//! `Diagnostic` (code, severity, message, primary span, notes) and hands it to
//! a `DiagnosticSink`; formatting for terminals or editors happens elsewhere.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue, DiagnosticSink};
