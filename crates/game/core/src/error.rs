//! Common error infrastructure for janggi-core.
//!
//! Domain-specific errors (`BoardError`, `DropError`, `ApplyError`, ...) live
//! next to the structures they guard. This module only provides the shared
//! classification used by the runtime to decide whether a failure is logged
//! and dropped or surfaced to the caller.

/// Severity level of an error, used for recovery strategies.
///
/// - **Recoverable**: the input went stale (e.g. a drop index shifted under an
///   interleaved snapshot); the operation becomes a no-op and play continues.
/// - **Validation**: the input was never valid and should not be retried as-is.
/// - **Internal**: a state inconsistency that indicates a bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all janggi-core errors.
///
/// Implementors derive `thiserror::Error` for `Display`/`Error` and classify
/// each variant by recoverability, not by impact.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for the error variant, handy for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
