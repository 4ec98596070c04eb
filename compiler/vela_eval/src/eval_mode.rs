//! Evaluation modes for the Vela interpreter.
//!
//! An `EvalMode` enum parameterizes the evaluator's policies: how deep calls
//! may nest and whether lazy views are wrapped in counting views.

/// Environment variable holding a maximum call depth.
pub const MAX_DEPTH_VAR: &str = "VELA_MAX_DEPTH";

/// Environment variable enabling view tracing (`1` or `true`).
pub const TRACE_VIEWS_VAR: &str = "VELA_TRACE_VIEWS";

/// Evaluation mode, selected per interpreter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Standard evaluation. Native targets grow the stack instead of
    /// limiting depth.
    #[default]
    Interpret,
    /// Calls nested deeper than `max_depth` fail with a stack overflow error.
    Bounded { max_depth: usize },
    /// Lazy values produced by the evaluator are wrapped in traced views
    /// that count element reads and materializations.
    Traced { max_depth: Option<usize> },
}

impl EvalMode {
    /// Maximum call depth, or `None` for unlimited (native `stacker` fallback).
    ///
    /// - `Interpret`: `None` on native, 200 on WASM
    /// - `Bounded`: the configured limit
    /// - `Traced`: the configured limit, else as `Interpret`
    #[inline]
    pub fn max_recursion_depth(&self) -> Option<usize> {
        match self {
            Self::Interpret => default_depth(),
            Self::Bounded { max_depth } => Some(*max_depth),
            Self::Traced { max_depth } => max_depth.or_else(default_depth),
        }
    }

    /// Whether lazy values are wrapped in counting views.
    #[inline]
    pub fn traces_views(&self) -> bool {
        matches!(self, Self::Traced { .. })
    }

    /// Mode described by `VELA_MAX_DEPTH` and `VELA_TRACE_VIEWS`.
    pub fn from_env() -> Self {
        let depth = std::env::var(MAX_DEPTH_VAR).ok();
        let trace = std::env::var(TRACE_VIEWS_VAR).ok();
        Self::from_settings(depth.as_deref(), trace.as_deref())
    }

    /// Mode from raw setting values. Unparseable depths are ignored with a
    /// warning.
    pub fn from_settings(max_depth: Option<&str>, trace_views: Option<&str>) -> Self {
        let max_depth = max_depth.and_then(|raw| match raw.trim().parse::<usize>() {
            Ok(depth) if depth > 0 => Some(depth),
            _ => {
                tracing::warn!(value = raw, "ignoring invalid {MAX_DEPTH_VAR}");
                None
            }
        });
        let trace = trace_views.is_some_and(|raw| {
            matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        });
        match (trace, max_depth) {
            (true, max_depth) => Self::Traced { max_depth },
            (false, Some(max_depth)) => Self::Bounded { max_depth },
            (false, None) => Self::Interpret,
        }
    }
}

#[inline]
fn default_depth() -> Option<usize> {
    #[cfg(target_arch = "wasm32")]
    {
        Some(200)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

#[cfg(test)]
mod tests;
