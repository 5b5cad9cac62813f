//! Effort, schedule and staffing calculation
//!
//! Formulas:
//! - B    = model.B + sum(weight * rating)
//! - EM   = product(cost driver value), 1.0 when empty
//! - PM   = A * Size^B * EM
//! - TDEV = C * PM^D, D = 0.28 + 0.2 * (B - 1.01)
//! - team = PM / TDEV
//!
//! Global invariants enforced:
//! - Pure functions of their inputs
//! - `team_size * duration_months == effort_pm` for every computed triple
//! - Every returned triple is finite and positive; inputs that overflow are rejected

use crate::error::{EstimationError, Result};
use crate::parametric::{CostDriver, ParametricInputs, ScaleFactor};
use serde::{Deserialize, Serialize};

/// Schedule coefficient C
pub const DURATION_C: f64 = 3.67;
/// Base of the schedule exponent D
pub const DURATION_D_BASE: f64 = 0.28;
/// Slope of the schedule exponent D against the scale exponent
pub const DURATION_D_SLOPE: f64 = 0.2;
/// Scale exponent at which D equals its base
pub const DURATION_B_OFFSET: f64 = 1.01;
/// Working hours in one person-month
pub const HOURS_PER_MONTH: f64 = 160.0;

/// How `base^exponent` is evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    /// Real-valued exponentiation
    #[default]
    Real,
    /// Repeated multiplication `trunc(exponent)` times.
    ///
    /// Reproduces the output of legacy tooling that truncated the exponent;
    /// any exponent below 1.0 yields 1.0 and below 2.0 yields `base`.
    TruncatedLegacy,
}

impl PowerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerMode::Real => "real",
            PowerMode::TruncatedLegacy => "truncated_legacy",
        }
    }

    pub fn pow(&self, base: f64, exponent: f64) -> f64 {
        match self {
            PowerMode::Real => base.powf(exponent),
            PowerMode::TruncatedLegacy => truncated_pow(base, exponent),
        }
    }
}

fn truncated_pow(base: f64, exponent: f64) -> f64 {
    let steps = if exponent >= 1.0 {
        exponent.trunc() as u64
    } else {
        0
    };
    let mut result = 1.0;
    for _ in 0..steps {
        result *= base;
    }
    result
}

/// Derived effort triple plus the exponent it was computed with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Effort {
    pub exponent_b: f64,
    pub effort_pm: f64,
    pub duration_months: f64,
    pub team_size: f64,
}

impl Effort {
    /// Effort expressed in working hours
    pub fn hours(&self) -> f64 {
        self.effort_pm * HOURS_PER_MONTH
    }
}

/// Scale exponent: model base exponent plus every scale factor's contribution
pub fn scale_exponent(model_b: f64, scale_factors: &[ScaleFactor]) -> f64 {
    scale_factors
        .iter()
        .fold(model_b, |acc, sf| acc + sf.weight * sf.rating)
}

/// Product of all cost-driver multipliers
pub fn effort_multiplier(cost_drivers: &[CostDriver]) -> f64 {
    cost_drivers.iter().map(|cd| cd.value).product()
}

/// Schedule exponent D for a given scale exponent
pub fn duration_exponent(exponent_b: f64) -> f64 {
    DURATION_D_BASE + DURATION_D_SLOPE * (exponent_b - DURATION_B_OFFSET)
}

/// Unadjusted effort: `A * Size^B` with the model's own exponent
pub fn base_effort(inputs: &ParametricInputs, mode: PowerMode) -> f64 {
    inputs.model.a * mode.pow(inputs.project_size, inputs.model.b)
}

/// Compute the effort triple from resolved inputs
///
/// Callers validate `project_size > 0` beforehand. Ratings that push any part
/// of the triple past `f64` range (or down to zero) fail with a Validation
/// error on `project_size`.
pub fn compute(inputs: &ParametricInputs, mode: PowerMode) -> Result<Effort> {
    let exponent_b = scale_exponent(inputs.model.b, &inputs.scale_factors);
    let em = effort_multiplier(&inputs.cost_drivers);
    let effort_pm = inputs.model.a * mode.pow(inputs.project_size, exponent_b) * em;
    let duration_months = DURATION_C * mode.pow(effort_pm, duration_exponent(exponent_b));
    let team_size = effort_pm / duration_months;

    tracing::debug!(
        exponent_b,
        effort_multiplier = em,
        effort_pm,
        duration_months,
        team_size,
        mode = mode.as_str(),
        "computed parametric effort"
    );

    let representable = [effort_pm, duration_months, team_size]
        .iter()
        .all(|v| v.is_normal() && *v > 0.0);
    if !representable {
        tracing::warn!(
            project_size = inputs.project_size,
            exponent_b,
            effort_pm,
            duration_months,
            team_size,
            "parametric effort out of range"
        );
        return Err(EstimationError::validation(
            "project_size",
            format!(
                "size {} with scale exponent {exponent_b:.2} overflows the effort calculation \
                 (effort {effort_pm:e} PM, duration {duration_months:e} months, team {team_size:e})",
                inputs.project_size
            ),
        ));
    }

    Ok(Effort {
        exponent_b,
        effort_pm,
        duration_months,
        team_size,
    })
}
