//! Adjustment factors applied to activity hours

use crate::error::{require_non_empty, EstimationError, Result};
use serde::{Deserialize, Serialize};

/// Broad grouping of adjustment factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorType {
    TeamExperience,
    ProjectComplexity,
    TechnicalDebt,
    RiskBuffer,
}

impl FactorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorType::TeamExperience => "team_experience",
            FactorType::ProjectComplexity => "project_complexity",
            FactorType::TechnicalDebt => "technical_debt",
            FactorType::RiskBuffer => "risk_buffer",
        }
    }
}

/// A named multiplier applied to hours
///
/// `impact` of 1.0 means no effect, above 1.0 adds time, below 1.0 removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Factor {
    #[serde(default)]
    pub id: String,
    pub factor_type: FactorType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub impact: f64,
}

impl Factor {
    pub fn new(
        id: impl Into<String>,
        factor_type: FactorType,
        name: impl Into<String>,
        impact: f64,
    ) -> Self {
        Factor {
            id: id.into(),
            factor_type,
            name: name.into(),
            description: String::new(),
            impact,
        }
    }

    /// Scale `hours` by this factor's impact
    pub fn apply(&self, hours: f64) -> f64 {
        hours * self.impact
    }

    /// Check the factor can be stored: a name and a positive impact
    pub fn validate(&self) -> Result<()> {
        require_non_empty("factor name", &self.name)?;
        if self.impact.is_nan() || self.impact <= 0.0 {
            return Err(EstimationError::validation(
                "factor impact",
                format!("must be greater than 0 (got {})", self.impact),
            ));
        }
        Ok(())
    }
}

/// Apply every factor in input order
pub fn apply_all(hours: f64, factors: &[Factor]) -> f64 {
    factors.iter().fold(hours, |acc, factor| factor.apply(acc))
}
