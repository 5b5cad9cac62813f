//! Detailed result generation
//!
//! Expands a computed parametric estimate into ranges, a phase breakdown,
//! per-factor sensitivity and a risk assessment.
//!
//! Global invariants enforced:
//! - Read-only projection: the estimate is never modified
//! - Phase percentages are fixed constants that sum to 1.0
//! - Factor and risk ordering follows the estimate's factor order

use crate::effort::{self, HOURS_PER_MONTH};
use crate::error::{EstimationError, Result};
use crate::parametric::{CostDriver, ParametricEstimate, ScaleFactor};
use serde::{Deserialize, Serialize};

/// Effort spread around the nominal value (±20%)
pub const EFFORT_SPREAD: f64 = 0.20;
/// Duration spread around the nominal value (±15%)
pub const DURATION_SPREAD: f64 = 0.15;
/// Team size spread around the average (±30%)
pub const TEAM_SIZE_SPREAD: f64 = 0.30;
/// Cost spread around the nominal value (±20%)
pub const COST_SPREAD: f64 = 0.20;

/// Scale factor rating above which an improvement is recommended
pub const SCALE_FACTOR_RECOMMEND_RATING: f64 = 3.5;
/// Cost driver multiplier above which an optimization is recommended
pub const COST_DRIVER_RECOMMEND_VALUE: f64 = 1.2;
/// Scale factor rating above which the factor counts as a risk
pub const SCALE_FACTOR_RISK_RATING: f64 = 4.0;
/// Cost driver multiplier above which the driver counts as a risk
pub const COST_DRIVER_RISK_VALUE: f64 = 1.3;
/// Project size above which the large-project risk applies
pub const LARGE_PROJECT_SIZE: f64 = 100.0;

/// Rating change used for scale factor sensitivity
const SCALE_FACTOR_STEP: f64 = 0.5;
/// Relative multiplier change used for cost driver sensitivity
const COST_DRIVER_STEP: f64 = 1.1;

/// Typical effort/schedule distribution for one development phase
#[derive(Debug, Clone, Copy)]
pub struct PhaseShare {
    pub phase: &'static str,
    pub percent_effort: f64,
    pub percent_duration: f64,
}

/// Fixed phase table
///
/// Duration shares overlap (phases run concurrently) and so do not sum to 1.0.
pub const PHASES: [PhaseShare; 6] = [
    PhaseShare {
        phase: "Requirements & Planning",
        percent_effort: 0.08,
        percent_duration: 0.15,
    },
    PhaseShare {
        phase: "System Design",
        percent_effort: 0.18,
        percent_duration: 0.25,
    },
    PhaseShare {
        phase: "Detailed Design",
        percent_effort: 0.25,
        percent_duration: 0.35,
    },
    PhaseShare {
        phase: "Construction & Unit Test",
        percent_effort: 0.26,
        percent_duration: 0.45,
    },
    PhaseShare {
        phase: "Integration Test",
        percent_effort: 0.15,
        percent_duration: 0.25,
    },
    PhaseShare {
        phase: "System Test",
        percent_effort: 0.08,
        percent_duration: 0.15,
    },
];

/// Optimistic / nominal / pessimistic triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range3 {
    pub optimistic: f64,
    pub nominal: f64,
    pub pessimistic: f64,
}

impl Range3 {
    fn around(nominal: f64, spread: f64) -> Self {
        Range3 {
            optimistic: nominal * (1.0 - spread),
            nominal,
            pessimistic: nominal * (1.0 + spread),
        }
    }
}

/// Minimum / average / maximum staffing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamSizeRange {
    pub minimum: f64,
    pub average: f64,
    pub maximum: f64,
}

/// Minimum / nominal / maximum cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub minimum: f64,
    pub nominal: f64,
    pub maximum: f64,
}

/// Cost projection at a given hourly rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CostEstimate {
    pub hourly_rate: f64,
    pub total_cost: f64,
    pub cost_range: CostRange,
}

/// Effort and schedule for one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PhaseEffort {
    pub phase: String,
    pub percent_effort: f64,
    pub percent_duration: f64,
    pub effort: f64,
    pub duration: f64,
    pub average_staff: f64,
}

/// Impact analysis of one scale factor or cost driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FactorAnalysis {
    pub name: String,
    pub rating: f64,
    pub impact: f64,
    pub sensitivity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Overall project risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Classify from the number of high-rated factors
    pub fn from_count(count: usize) -> Self {
        if count >= 3 {
            RiskLevel::High
        } else if count >= 1 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Where a risk originates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    Technical,
    Cost,
    Schedule,
    Process,
}

/// A specific project risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RiskFactor {
    pub category: RiskCategory,
    pub name: String,
    pub level: RiskLevel,
    pub impact: f64,
    pub description: String,
    pub mitigation: String,
}

/// Full report derived from a parametric estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DetailedResult {
    pub project_size: f64,
    pub model_type: String,
    pub base_effort: f64,
    pub adjusted_effort: f64,
    pub effort_range: Range3,
    pub duration: f64,
    pub duration_range: Range3,
    pub team_size: f64,
    pub team_size_range: TeamSizeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<CostEstimate>,
    pub phase_distribution: Vec<PhaseEffort>,
    pub scale_factor_analysis: Vec<FactorAnalysis>,
    pub cost_driver_analysis: Vec<FactorAnalysis>,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<RiskFactor>,
}

/// Generate the detailed report
///
/// `hourly_rate` of `None` or `0.0` omits the cost estimate; a negative rate
/// is rejected.
pub fn generate(estimate: &ParametricEstimate, hourly_rate: Option<f64>) -> Result<DetailedResult> {
    if let Some(rate) = hourly_rate {
        if rate.is_nan() || rate < 0.0 {
            return Err(EstimationError::validation(
                "hourly_rate",
                format!("must be non-negative (got {rate})"),
            ));
        }
    }

    let effort_pm = estimate.effort_pm();
    let duration = estimate.duration_months();
    let team_size = estimate.team_size();

    let cost_estimate = hourly_rate
        .filter(|rate| *rate > 0.0)
        .map(|rate| cost_estimate(effort_pm, rate));

    Ok(DetailedResult {
        project_size: estimate.project_size(),
        model_type: estimate.model().name.clone(),
        base_effort: effort::base_effort(estimate.inputs(), estimate.power_mode()),
        adjusted_effort: effort_pm,
        effort_range: Range3::around(effort_pm, EFFORT_SPREAD),
        duration,
        duration_range: Range3::around(duration, DURATION_SPREAD),
        team_size,
        team_size_range: TeamSizeRange {
            minimum: team_size * (1.0 - TEAM_SIZE_SPREAD),
            average: team_size,
            maximum: team_size * (1.0 + TEAM_SIZE_SPREAD),
        },
        cost_estimate,
        phase_distribution: phase_distribution(effort_pm, duration),
        scale_factor_analysis: estimate
            .scale_factors()
            .iter()
            .map(|sf| analyze_scale_factor(sf, effort_pm))
            .collect(),
        cost_driver_analysis: estimate
            .cost_drivers()
            .iter()
            .map(analyze_cost_driver)
            .collect(),
        risk_level: assess_risk_level(estimate.scale_factors(), estimate.cost_drivers()),
        risk_factors: identify_risk_factors(
            estimate.scale_factors(),
            estimate.cost_drivers(),
            estimate.project_size(),
        ),
    })
}

/// Cost at `effort_pm * 160 * rate`, ±20%
pub fn cost_estimate(effort_pm: f64, hourly_rate: f64) -> CostEstimate {
    let total_cost = effort_pm * HOURS_PER_MONTH * hourly_rate;
    CostEstimate {
        hourly_rate,
        total_cost,
        cost_range: CostRange {
            minimum: total_cost * (1.0 - COST_SPREAD),
            nominal: total_cost,
            maximum: total_cost * (1.0 + COST_SPREAD),
        },
    }
}

/// Split effort and duration across the fixed phase table
pub fn phase_distribution(effort_pm: f64, duration_months: f64) -> Vec<PhaseEffort> {
    PHASES
        .iter()
        .map(|share| {
            let effort = effort_pm * share.percent_effort;
            let duration = duration_months * share.percent_duration;
            PhaseEffort {
                phase: share.phase.to_string(),
                percent_effort: share.percent_effort,
                percent_duration: share.percent_duration,
                effort,
                duration,
                average_staff: effort / duration,
            }
        })
        .collect()
}

fn analyze_scale_factor(sf: &ScaleFactor, effort_pm: f64) -> FactorAnalysis {
    let recommendation = (sf.rating > SCALE_FACTOR_RECOMMEND_RATING).then(|| {
        format!(
            "Improving {} could reduce the effort exponent",
            sf.name.to_lowercase()
        )
    });
    FactorAnalysis {
        name: sf.name.clone(),
        rating: sf.rating,
        impact: sf.impact(),
        sensitivity: (sf.weight * SCALE_FACTOR_STEP) / effort_pm,
        recommendation,
    }
}

/// Sensitivity is the relative change of a 10% multiplier increase, which is
/// always 0.1 irrespective of the driver.
fn analyze_cost_driver(cd: &CostDriver) -> FactorAnalysis {
    let increased = cd.value * COST_DRIVER_STEP;
    let recommendation = (cd.value > COST_DRIVER_RECOMMEND_VALUE).then(|| {
        format!(
            "Optimizing {} could reduce the effort multiplier",
            cd.name.to_lowercase()
        )
    });
    FactorAnalysis {
        name: cd.name.clone(),
        rating: cd.rating,
        impact: cd.value,
        sensitivity: (increased - cd.value) / cd.value,
        recommendation,
    }
}

fn high_risk_count(scale_factors: &[ScaleFactor], cost_drivers: &[CostDriver]) -> usize {
    let sf = scale_factors
        .iter()
        .filter(|sf| sf.rating > SCALE_FACTOR_RISK_RATING)
        .count();
    let cd = cost_drivers
        .iter()
        .filter(|cd| cd.value > COST_DRIVER_RISK_VALUE)
        .count();
    sf + cd
}

/// Overall risk level from the count of high-rated factors
pub fn assess_risk_level(scale_factors: &[ScaleFactor], cost_drivers: &[CostDriver]) -> RiskLevel {
    RiskLevel::from_count(high_risk_count(scale_factors, cost_drivers))
}

/// One risk per high-rated factor, plus a size risk for large projects
pub fn identify_risk_factors(
    scale_factors: &[ScaleFactor],
    cost_drivers: &[CostDriver],
    project_size: f64,
) -> Vec<RiskFactor> {
    let mut risks = Vec::new();

    for sf in scale_factors
        .iter()
        .filter(|sf| sf.rating > SCALE_FACTOR_RISK_RATING)
    {
        risks.push(RiskFactor {
            category: RiskCategory::Process,
            name: sf.name.clone(),
            level: RiskLevel::High,
            impact: sf.impact(),
            description: "High scale factor rating inflates the effort exponent".to_string(),
            mitigation: "Consider process improvements and risk reduction measures".to_string(),
        });
    }

    for cd in cost_drivers
        .iter()
        .filter(|cd| cd.value > COST_DRIVER_RISK_VALUE)
    {
        risks.push(RiskFactor {
            category: RiskCategory::Technical,
            name: cd.name.clone(),
            level: RiskLevel::High,
            impact: cd.value,
            description: "High cost driver multiplier inflates effort".to_string(),
            mitigation: "Consider technical countermeasures and improvements".to_string(),
        });
    }

    if project_size > LARGE_PROJECT_SIZE {
        risks.push(RiskFactor {
            category: RiskCategory::Technical,
            name: "Large project".to_string(),
            level: RiskLevel::Medium,
            impact: 1.3,
            description: "Project scale increases integration and coordination complexity"
                .to_string(),
            mitigation: "Consider modularization and incremental delivery".to_string(),
        });
    }

    risks
}
