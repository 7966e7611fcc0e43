//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (e.g. [`crate::BattleError`], [`crate::CatalogError`])
//! live next to the code that produces them; this module only provides the
//! shared classification used by the runtime to log and report them.
//!
//! # Design Principles
//!
//! - **Type Safety**: each concern has its own error enum with specific variants
//! - **Stable Codes**: every variant maps to a fixed string clients can branch on
//! - **Severity Classification**: errors are categorized for recovery strategies

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: temporary conditions that may succeed later (wait for your turn)
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: unrecoverable errors such as corrupted static content
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: not your turn, ability on cooldown
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown ability, dead target
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - static data corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Never reuse an error code for a different variant
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Codes are part of the wire contract: clients branch on them to show
    /// specific feedback (e.g. flash "not enough mana").
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
