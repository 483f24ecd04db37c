//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Covers deterministic failures of the non-vend operations (deposits,
/// stocking, identifier parsing). Vend rejections have their own closed error
/// type in the machine crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. zero-coin deposit, blank item name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A conflict with existing state (e.g. re-pricing a stocked item).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_detail() {
        assert_eq!(
            DomainError::validation("deposit must be positive").to_string(),
            "validation failed: deposit must be positive"
        );
        assert_eq!(
            DomainError::invariant("balance would overflow").to_string(),
            "invariant violated: balance would overflow"
        );
        assert_eq!(
            DomainError::conflict("price mismatch").to_string(),
            "conflict: price mismatch"
        );
    }
}
