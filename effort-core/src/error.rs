//! Error taxonomy for the estimation engine
//!
//! Every failure aborts the whole computation. Nothing is retried here:
//! the engine performs no I/O of its own beyond the injected lookups.

use std::fmt;

/// Kind of catalog or stored entity a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Model,
    ScaleFactor,
    CostDriver,
    Process,
    Activity,
    Estimate,
    ParametricEstimate,
    Factor,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Model => "model",
            EntityKind::ScaleFactor => "scale factor",
            EntityKind::CostDriver => "cost driver",
            EntityKind::Process => "process",
            EntityKind::Activity => "activity",
            EntityKind::Estimate => "estimate",
            EntityKind::ParametricEstimate => "parametric estimate",
            EntityKind::Factor => "factor",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the estimation engine and its use-case services
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    /// Caller-fixable input error
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Referenced id is unknown to the catalog or store
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Failure reported by a persistence collaborator
    #[error("storage error: {0}")]
    Storage(String),
}

impl EstimationError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        EstimationError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        EstimationError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EstimationError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, EstimationError>;

/// Reject empty or whitespace-only identifiers and names
pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EstimationError::validation(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EstimationError::not_found(EntityKind::CostDriver, "rely");
        assert_eq!(err.to_string(), "cost driver not found: rely");

        let err = EstimationError::validation("project_size", "must be greater than 0");
        assert_eq!(
            err.to_string(),
            "invalid project_size: must be greater than 0"
        );
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("name", "x").is_ok());
        assert!(require_non_empty("name", "").is_err());
        assert!(require_non_empty("name", "   ").is_err());
    }
}
