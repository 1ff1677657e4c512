use std::fmt;

use kestrel_ast::Span;
use smol_str::SmolStr;

/// A user-facing type error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub message: String,
    pub span: Span,
}

impl TypeError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}] {}",
            self.span.start, self.span.end, self.message
        )
    }
}

impl std::error::Error for TypeError {}

/// A bug in the checker itself. These abort the run; they never describe
/// the program being checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    #[error("internal error: `{0}` builtin was not found")]
    MissingBuiltin(&'static str),

    #[error("internal error: pushed a checked function `{0}` but it's not defined")]
    MissingMethodStub(SmolStr),

    #[error("internal error: record `{0}` was not allocated at its precomputed id")]
    RecordOutOfOrder(SmolStr),

    #[error("internal error: substitution did not reach a fixed point after {rounds} rounds")]
    SubstitutionDiverged { rounds: usize },
}

/// Result of a checking step. `Err` aborts the whole run.
pub type CheckResult<T = Option<TypeError>> = Result<T, InternalError>;

/// Keep the earliest error: later ones are dropped.
pub(crate) fn keep_first(slot: &mut Option<TypeError>, err: Option<TypeError>) {
    if slot.is_none() {
        *slot = err;
    }
}
