//! Reconciliation of activity-based and parametric estimates
//!
//! The project total is the confidence-weighted average of both methods;
//! without a parametric estimate it is the activity-based total unchanged.

use crate::effort::HOURS_PER_MONTH;
use crate::parametric::ParametricEstimate;
use serde::{Deserialize, Serialize};

/// Confidence assigned to the activity-based method
pub const ACTIVITY_CONFIDENCE: f64 = 0.8;
/// Confidence assigned to the parametric method
pub const PARAMETRIC_CONFIDENCE: f64 = 0.85;
/// Team size assumed by the activity-based method
pub const DEFAULT_TEAM_SIZE: f64 = 5.0;

/// Estimation method tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationMethod {
    #[serde(rename = "activity_based")]
    ActivityBased,
    #[serde(rename = "cocomo_based")]
    Parametric,
}

impl CalculationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationMethod::ActivityBased => "activity_based",
            CalculationMethod::Parametric => "cocomo_based",
        }
    }
}

/// Totals produced by one estimation method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CalculationResult {
    pub method: CalculationMethod,
    pub total_hours: f64,
    pub person_months: f64,
    pub team_size: f64,
    pub duration_months: f64,
    pub confidence: f64,
}

/// Express a computed parametric estimate as a calculation result
pub fn parametric_result(estimate: &ParametricEstimate) -> CalculationResult {
    CalculationResult {
        method: CalculationMethod::Parametric,
        total_hours: estimate.effort_pm() * HOURS_PER_MONTH,
        person_months: estimate.effort_pm(),
        team_size: estimate.team_size(),
        duration_months: estimate.duration_months(),
        confidence: PARAMETRIC_CONFIDENCE,
    }
}

/// Both method results and the blended project total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Reconciliation {
    pub activity: CalculationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parametric: Option<CalculationResult>,
    pub total_hours: f64,
}

/// Blend the two totals by confidence weight
pub fn reconcile(
    activity: &CalculationResult,
    parametric: Option<&CalculationResult>,
) -> Reconciliation {
    let total_hours = match parametric {
        None => activity.total_hours,
        Some(p) => {
            let total_confidence = activity.confidence + p.confidence;
            let activity_weight = activity.confidence / total_confidence;
            let parametric_weight = p.confidence / total_confidence;
            activity.total_hours * activity_weight + p.total_hours * parametric_weight
        }
    };

    Reconciliation {
        activity: *activity,
        parametric: parametric.copied(),
        total_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::activity_result;

    fn param(total_hours: f64) -> CalculationResult {
        CalculationResult {
            method: CalculationMethod::Parametric,
            total_hours,
            person_months: total_hours / 160.0,
            team_size: 3.0,
            duration_months: 6.0,
            confidence: PARAMETRIC_CONFIDENCE,
        }
    }

    #[test]
    fn test_no_parametric_uses_activity_total() {
        let a = activity_result(1234.5);
        let r = reconcile(&a, None);
        assert_eq!(r.total_hours, 1234.5);
        assert!(r.parametric.is_none());
    }

    #[test]
    fn test_weighted_average() {
        let a = activity_result(1000.0);
        let p = param(2000.0);
        let r = reconcile(&a, Some(&p));
        let expected = 1000.0 * (0.8 / 1.65) + 2000.0 * (0.85 / 1.65);
        assert!((r.total_hours - expected).abs() < 1e-9);
        assert!(r.total_hours > 1000.0 && r.total_hours < 2000.0);
    }

    #[test]
    fn test_result_stays_between_inputs() {
        for (a, b) in [(0.0, 10.0), (500.0, 1.0), (3.3, 3.3), (1e6, 2e6)] {
            let r = reconcile(&activity_result(a), Some(&param(b)));
            let lo = f64::min(a, b);
            let hi = f64::max(a, b);
            assert!(r.total_hours >= lo - 1e-9 && r.total_hours <= hi + 1e-9);
        }
    }

    #[test]
    fn test_agreeing_inputs_return_same_value() {
        let r = reconcile(&activity_result(800.0), Some(&param(800.0)));
        assert!((r.total_hours - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_method_tags_serialize() {
        assert_eq!(
            serde_json::to_string(&CalculationMethod::ActivityBased).unwrap(),
            "\"activity_based\""
        );
        assert_eq!(
            serde_json::to_string(&CalculationMethod::Parametric).unwrap(),
            "\"cocomo_based\""
        );
    }
}
