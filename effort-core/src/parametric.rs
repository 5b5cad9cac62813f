//! Parametric cost model inputs (COCOMO II structure)
//!
//! Global invariants enforced:
//! - Derived effort fields are never stored apart from the inputs they came from
//! - Every input mutation recomputes the whole derived triple at once, and a
//!   mutation that fails leaves the estimate unchanged
//! - Scale-factor weights and cost-driver categories are catalog data, never rated

use crate::effort::{self, Effort, PowerMode};
use crate::error::{require_non_empty, EntityKind, EstimationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Lowest accepted rating ("Very Low")
pub const RATING_MIN: f64 = 0.0;
/// Highest accepted rating ("Extra High")
pub const RATING_MAX: f64 = 5.0;

/// Human label for a rating on the 0-5 scale
pub fn rating_label(rating: f64) -> &'static str {
    match rating.round() as i64 {
        i64::MIN..=0 => "Very Low",
        1 => "Low",
        2 => "Nominal",
        3 => "High",
        4 => "Very High",
        _ => "Extra High",
    }
}

/// Reject ratings outside [0, 5] (and NaN)
pub fn validate_rating(field: &'static str, rating: f64) -> Result<()> {
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(EstimationError::validation(
            field,
            format!("rating must be between {RATING_MIN} and {RATING_MAX} (got {rating})"),
        ));
    }
    Ok(())
}

/// The five exponential scale factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleFactorType {
    Precedentedness,
    DevelopmentFlexibility,
    ArchitectureRisk,
    TeamCohesion,
    ProcessMaturity,
}

impl ScaleFactorType {
    pub const ALL: [ScaleFactorType; 5] = [
        ScaleFactorType::Precedentedness,
        ScaleFactorType::DevelopmentFlexibility,
        ScaleFactorType::ArchitectureRisk,
        ScaleFactorType::TeamCohesion,
        ScaleFactorType::ProcessMaturity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleFactorType::Precedentedness => "precedentedness",
            ScaleFactorType::DevelopmentFlexibility => "development_flexibility",
            ScaleFactorType::ArchitectureRisk => "architecture_risk",
            ScaleFactorType::TeamCohesion => "team_cohesion",
            ScaleFactorType::ProcessMaturity => "process_maturity",
        }
    }

    /// Empirical weight of this category
    pub fn standard_weight(&self) -> f64 {
        match self {
            ScaleFactorType::Precedentedness => 4.05,
            ScaleFactorType::DevelopmentFlexibility => 3.04,
            ScaleFactorType::ArchitectureRisk => 4.24,
            ScaleFactorType::TeamCohesion => 3.29,
            ScaleFactorType::ProcessMaturity => 4.68,
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            ScaleFactorType::Precedentedness => "Precedentedness",
            ScaleFactorType::DevelopmentFlexibility => "Development Flexibility",
            ScaleFactorType::ArchitectureRisk => "Architecture / Risk Resolution",
            ScaleFactorType::TeamCohesion => "Team Cohesion",
            ScaleFactorType::ProcessMaturity => "Process Maturity",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ScaleFactorType::Precedentedness => "Experience with similar projects",
            ScaleFactorType::DevelopmentFlexibility => "Flexibility of the development process",
            ScaleFactorType::ArchitectureRisk => {
                "Degree of risk management and architecture resolution"
            }
            ScaleFactorType::TeamCohesion => "Cooperation and consistency within the team",
            ScaleFactorType::ProcessMaturity => "Organizational process maturity",
        }
    }
}

/// Exponential scale factor: contributes `weight * rating` to the exponent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScaleFactor {
    pub id: String,
    pub factor_type: ScaleFactorType,
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub weight: f64,
}

impl ScaleFactor {
    /// Catalog entry for a standard category, unrated
    pub fn standard(factor_type: ScaleFactorType) -> Self {
        ScaleFactor {
            id: factor_type.as_str().to_string(),
            factor_type,
            name: factor_type.display_name().to_string(),
            description: factor_type.description().to_string(),
            rating: 0.0,
            weight: factor_type.standard_weight(),
        }
    }

    /// Exponent contribution
    pub fn impact(&self) -> f64 {
        self.weight * self.rating
    }
}

/// Grouping of cost drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostDriverCategory {
    Product,
    Platform,
    Personnel,
    Project,
}

impl CostDriverCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostDriverCategory::Product => "product",
            CostDriverCategory::Platform => "platform",
            CostDriverCategory::Personnel => "personnel",
            CostDriverCategory::Project => "project",
        }
    }
}

/// Effort-multiplier categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostDriverType {
    RequiredReliability,
    DatabaseSize,
    ProductComplexity,
    RequiredReusability,
    Documentation,
    ExecutionTime,
    StorageConstraint,
    PlatformVolatility,
    AnalystCapability,
    ProgrammerCapability,
    PersonnelContinuity,
    ApplicationExperience,
    PlatformExperience,
    LanguageExperience,
    ToolUse,
    MultisiteDevelopment,
    ScheduleConstraint,
}

impl CostDriverType {
    pub const ALL: [CostDriverType; 17] = [
        CostDriverType::RequiredReliability,
        CostDriverType::DatabaseSize,
        CostDriverType::ProductComplexity,
        CostDriverType::RequiredReusability,
        CostDriverType::Documentation,
        CostDriverType::ExecutionTime,
        CostDriverType::StorageConstraint,
        CostDriverType::PlatformVolatility,
        CostDriverType::AnalystCapability,
        CostDriverType::ProgrammerCapability,
        CostDriverType::PersonnelContinuity,
        CostDriverType::ApplicationExperience,
        CostDriverType::PlatformExperience,
        CostDriverType::LanguageExperience,
        CostDriverType::ToolUse,
        CostDriverType::MultisiteDevelopment,
        CostDriverType::ScheduleConstraint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostDriverType::RequiredReliability => "required_reliability",
            CostDriverType::DatabaseSize => "database_size",
            CostDriverType::ProductComplexity => "product_complexity",
            CostDriverType::RequiredReusability => "required_reusability",
            CostDriverType::Documentation => "documentation",
            CostDriverType::ExecutionTime => "execution_time",
            CostDriverType::StorageConstraint => "storage_constraint",
            CostDriverType::PlatformVolatility => "platform_volatility",
            CostDriverType::AnalystCapability => "analyst_capability",
            CostDriverType::ProgrammerCapability => "programmer_capability",
            CostDriverType::PersonnelContinuity => "personnel_continuity",
            CostDriverType::ApplicationExperience => "application_experience",
            CostDriverType::PlatformExperience => "platform_experience",
            CostDriverType::LanguageExperience => "language_experience",
            CostDriverType::ToolUse => "tool_use",
            CostDriverType::MultisiteDevelopment => "multisite_development",
            CostDriverType::ScheduleConstraint => "schedule_constraint",
        }
    }

    pub fn category(&self) -> CostDriverCategory {
        use CostDriverType::*;
        match self {
            RequiredReliability | DatabaseSize | ProductComplexity | RequiredReusability
            | Documentation => CostDriverCategory::Product,
            ExecutionTime | StorageConstraint | PlatformVolatility => CostDriverCategory::Platform,
            AnalystCapability | ProgrammerCapability | PersonnelContinuity
            | ApplicationExperience | PlatformExperience | LanguageExperience => {
                CostDriverCategory::Personnel
            }
            ToolUse | MultisiteDevelopment | ScheduleConstraint => CostDriverCategory::Project,
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            CostDriverType::RequiredReliability => "Required Software Reliability",
            CostDriverType::DatabaseSize => "Database Size",
            CostDriverType::ProductComplexity => "Product Complexity",
            CostDriverType::RequiredReusability => "Developed for Reusability",
            CostDriverType::Documentation => "Documentation Match to Life-Cycle Needs",
            CostDriverType::ExecutionTime => "Execution Time Constraint",
            CostDriverType::StorageConstraint => "Main Storage Constraint",
            CostDriverType::PlatformVolatility => "Platform Volatility",
            CostDriverType::AnalystCapability => "Analyst Capability",
            CostDriverType::ProgrammerCapability => "Programmer Capability",
            CostDriverType::PersonnelContinuity => "Personnel Continuity",
            CostDriverType::ApplicationExperience => "Applications Experience",
            CostDriverType::PlatformExperience => "Platform Experience",
            CostDriverType::LanguageExperience => "Language and Tool Experience",
            CostDriverType::ToolUse => "Use of Software Tools",
            CostDriverType::MultisiteDevelopment => "Multisite Development",
            CostDriverType::ScheduleConstraint => "Required Development Schedule",
        }
    }
}

/// Effort multiplier: contributes `value` to the product of drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CostDriver {
    pub id: String,
    pub driver_type: CostDriverType,
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub value: f64,
}

impl CostDriver {
    /// Catalog entry for a standard category at the nominal multiplier
    pub fn standard(driver_type: CostDriverType) -> Self {
        CostDriver {
            id: driver_type.as_str().to_string(),
            driver_type,
            name: driver_type.display_name().to_string(),
            description: String::new(),
            rating: 0.0,
            value: 1.0,
        }
    }

    pub fn category(&self) -> CostDriverCategory {
        self.driver_type.category()
    }
}

/// Calibration constants of the effort equation `PM = A * Size^B * EM`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ParametricModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub a: f64,
    pub b: f64,
}

impl ParametricModel {
    pub const EARLY_DESIGN_ID: &'static str = "early_design";
    pub const POST_ARCHITECTURE_ID: &'static str = "post_architecture";

    pub fn early_design() -> Self {
        ParametricModel {
            id: Self::EARLY_DESIGN_ID.to_string(),
            name: "Early Design".to_string(),
            description: "Early Design model for early project estimation".to_string(),
            a: 2.94,
            b: 0.91,
        }
    }

    pub fn post_architecture() -> Self {
        ParametricModel {
            id: Self::POST_ARCHITECTURE_ID.to_string(),
            name: "Post-Architecture".to_string(),
            description: "Post-Architecture model for detailed estimation".to_string(),
            a: 2.45,
            b: 0.91,
        }
    }
}

/// A caller-supplied rating for one scale factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactorRating {
    pub id: String,
    pub rating: f64,
}

/// A caller-supplied rating for one cost driver
///
/// `value` overrides the catalog multiplier for this estimate only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDriverRating {
    pub id: String,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Fully resolved, validated calculation input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParametricInputs {
    pub project_size: f64,
    pub model: ParametricModel,
    pub scale_factors: Vec<ScaleFactor>,
    pub cost_drivers: Vec<CostDriver>,
}

impl ParametricInputs {
    /// Check size, ratings and multipliers before any arithmetic
    pub fn validate(&self) -> Result<()> {
        validate_project_size(self.project_size)?;
        for sf in &self.scale_factors {
            validate_rating("scale factor rating", sf.rating)?;
        }
        for cd in &self.cost_drivers {
            validate_rating("cost driver rating", cd.rating)?;
            validate_multiplier(cd.value)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_project_size(size: f64) -> Result<()> {
    if size.is_nan() || size <= 0.0 || size.is_infinite() {
        return Err(EstimationError::validation(
            "project_size",
            format!("must be greater than 0 (got {size})"),
        ));
    }
    Ok(())
}

fn validate_multiplier(value: f64) -> Result<()> {
    if value.is_nan() || value <= 0.0 {
        return Err(EstimationError::validation(
            "cost driver value",
            format!("must be greater than 0 (got {value})"),
        ));
    }
    Ok(())
}

/// Fail when the same id appears twice in one rating list
pub(crate) fn reject_duplicates<'a>(
    field: &'static str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EstimationError::validation(
                field,
                format!("{id:?} is listed more than once"),
            ));
        }
    }
    Ok(())
}

/// A parametric estimate: inputs plus the effort triple derived from them
///
/// Fields are private so the derived triple can only change together with
/// the inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParametricEstimate {
    id: String,
    #[serde(flatten)]
    inputs: ParametricInputs,
    power_mode: PowerMode,
    #[serde(flatten)]
    effort: Effort,
}

impl ParametricEstimate {
    /// Validate inputs and compute the derived fields
    pub fn new(id: impl Into<String>, inputs: ParametricInputs, mode: PowerMode) -> Result<Self> {
        let id = id.into();
        require_non_empty("estimate id", &id)?;
        inputs.validate()?;
        let effort = effort::compute(&inputs, mode)?;
        Ok(ParametricEstimate {
            id,
            inputs,
            power_mode: mode,
            effort,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn inputs(&self) -> &ParametricInputs {
        &self.inputs
    }

    pub fn project_size(&self) -> f64 {
        self.inputs.project_size
    }

    pub fn model(&self) -> &ParametricModel {
        &self.inputs.model
    }

    pub fn scale_factors(&self) -> &[ScaleFactor] {
        &self.inputs.scale_factors
    }

    pub fn cost_drivers(&self) -> &[CostDriver] {
        &self.inputs.cost_drivers
    }

    pub fn power_mode(&self) -> PowerMode {
        self.power_mode
    }

    pub fn effort(&self) -> Effort {
        self.effort
    }

    pub fn exponent_b(&self) -> f64 {
        self.effort.exponent_b
    }

    pub fn effort_pm(&self) -> f64 {
        self.effort.effort_pm
    }

    pub fn duration_months(&self) -> f64 {
        self.effort.duration_months
    }

    pub fn team_size(&self) -> f64 {
        self.effort.team_size
    }

    /// Recompute the derived triple from the current inputs
    pub fn recalculate(&mut self) -> Result<()> {
        self.effort = effort::compute(&self.inputs, self.power_mode)?;
        Ok(())
    }

    /// Replace inputs and mode together once the new triple is computed
    fn commit(&mut self, inputs: ParametricInputs, mode: PowerMode) -> Result<()> {
        let effort = effort::compute(&inputs, mode)?;
        self.inputs = inputs;
        self.power_mode = mode;
        self.effort = effort;
        Ok(())
    }

    pub fn set_project_size(&mut self, size: f64) -> Result<()> {
        validate_project_size(size)?;
        let mut inputs = self.inputs.clone();
        inputs.project_size = size;
        self.commit(inputs, self.power_mode)
    }

    pub fn set_model(&mut self, model: ParametricModel) -> Result<()> {
        let mut inputs = self.inputs.clone();
        inputs.model = model;
        self.commit(inputs, self.power_mode)
    }

    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<()> {
        self.commit(self.inputs.clone(), mode)
    }

    /// Re-rate scale factors and cost drivers already on this estimate
    ///
    /// All ids and ratings are checked first; on error nothing changes.
    pub fn apply_ratings(
        &mut self,
        scale_factors: &[ScaleFactorRating],
        cost_drivers: &[CostDriverRating],
    ) -> Result<()> {
        reject_duplicates("scale_factors", scale_factors.iter().map(|r| r.id.as_str()))?;
        reject_duplicates("cost_drivers", cost_drivers.iter().map(|r| r.id.as_str()))?;
        let mut inputs = self.inputs.clone();

        for change in scale_factors {
            validate_rating("scale factor rating", change.rating)?;
            let sf = inputs
                .scale_factors
                .iter_mut()
                .find(|sf| sf.id == change.id)
                .ok_or_else(|| EstimationError::not_found(EntityKind::ScaleFactor, &change.id))?;
            sf.rating = change.rating;
        }

        for change in cost_drivers {
            validate_rating("cost driver rating", change.rating)?;
            let cd = inputs
                .cost_drivers
                .iter_mut()
                .find(|cd| cd.id == change.id)
                .ok_or_else(|| EstimationError::not_found(EntityKind::CostDriver, &change.id))?;
            cd.rating = change.rating;
            if let Some(value) = change.value {
                validate_multiplier(value)?;
                cd.value = value;
            }
        }

        self.commit(inputs, self.power_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(size: f64) -> ParametricInputs {
        ParametricInputs {
            project_size: size,
            model: ParametricModel::post_architecture(),
            scale_factors: ScaleFactorType::ALL
                .iter()
                .map(|t| ScaleFactor::standard(*t))
                .collect(),
            cost_drivers: vec![CostDriver::standard(CostDriverType::ProductComplexity)],
        }
    }

    #[test]
    fn test_standard_weights() {
        let weights: Vec<f64> = ScaleFactorType::ALL
            .iter()
            .map(|t| t.standard_weight())
            .collect();
        assert_eq!(weights, vec![4.05, 3.04, 4.24, 3.29, 4.68]);
    }

    #[test]
    fn test_cost_driver_categories() {
        let count = |c: CostDriverCategory| {
            CostDriverType::ALL
                .iter()
                .filter(|t| t.category() == c)
                .count()
        };
        assert_eq!(count(CostDriverCategory::Product), 5);
        assert_eq!(count(CostDriverCategory::Platform), 3);
        assert_eq!(count(CostDriverCategory::Personnel), 6);
        assert_eq!(count(CostDriverCategory::Project), 3);
    }

    #[test]
    fn test_model_variants_differ_only_in_a() {
        let early = ParametricModel::early_design();
        let post = ParametricModel::post_architecture();
        assert_eq!(early.a, 2.94);
        assert_eq!(post.a, 2.45);
        assert_eq!(early.b, post.b);
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(rating_label(0.0), "Very Low");
        assert_eq!(rating_label(2.0), "Nominal");
        assert_eq!(rating_label(3.6), "Very High");
        assert_eq!(rating_label(5.0), "Extra High");
    }

    #[test]
    fn test_new_rejects_non_positive_size() {
        for size in [0.0, -1.0, f64::NAN] {
            let err = ParametricEstimate::new("e1", inputs(size), PowerMode::Real).unwrap_err();
            assert!(matches!(err, EstimationError::Validation { .. }));
        }
    }

    #[test]
    fn test_new_rejects_out_of_range_rating() {
        let mut i = inputs(10.0);
        i.scale_factors[0].rating = 5.5;
        assert!(ParametricEstimate::new("e1", i, PowerMode::Real).is_err());
    }

    #[test]
    fn test_set_project_size_recomputes_triple() {
        let mut est = ParametricEstimate::new("e1", inputs(10.0), PowerMode::Real).unwrap();
        let before = est.effort();
        est.set_project_size(20.0).unwrap();
        assert!(est.effort_pm() > before.effort_pm);
        assert!((est.team_size() * est.duration_months() - est.effort_pm()).abs() < 1e-9);
    }

    #[test]
    fn test_set_project_size_rejects_without_change() {
        let mut est = ParametricEstimate::new("e1", inputs(10.0), PowerMode::Real).unwrap();
        let before = est.clone();
        assert!(est.set_project_size(0.0).is_err());
        assert_eq!(est, before);
    }

    #[test]
    fn test_apply_ratings_is_all_or_nothing() {
        let mut est = ParametricEstimate::new("e1", inputs(10.0), PowerMode::Real).unwrap();
        let before = est.clone();
        let err = est
            .apply_ratings(
                &[ScaleFactorRating {
                    id: "precedentedness".to_string(),
                    rating: 4.0,
                }],
                &[CostDriverRating {
                    id: "unknown".to_string(),
                    rating: 3.0,
                    value: None,
                }],
            )
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(est, before);
    }

    fn all_rated(rating: f64) -> Vec<ScaleFactorRating> {
        ScaleFactorType::ALL
            .iter()
            .map(|t| ScaleFactorRating {
                id: t.as_str().to_string(),
                rating,
            })
            .collect()
    }

    #[test]
    fn test_new_rejects_ratings_that_overflow() {
        let mut i = inputs(10.0);
        i.model = ParametricModel::early_design();
        for sf in &mut i.scale_factors {
            sf.rating = 5.0;
        }
        let err = ParametricEstimate::new("e1", i, PowerMode::Real).unwrap_err();
        assert!(matches!(
            err,
            EstimationError::Validation {
                field: "project_size",
                ..
            }
        ));
    }

    #[test]
    fn test_overflowing_mutations_leave_estimate_unchanged() {
        let mut i = inputs(10.0);
        for sf in &mut i.scale_factors {
            sf.rating = 1.0;
        }
        let mut est = ParametricEstimate::new("e1", i, PowerMode::Real).unwrap();
        assert!(est.duration_months().is_finite());
        let before = est.clone();

        assert!(est.set_project_size(1e6).is_err());
        assert_eq!(est, before);
        assert!(est.apply_ratings(&all_rated(5.0), &[]).is_err());
        assert_eq!(est, before);
    }

    #[test]
    fn test_apply_ratings_rejects_duplicate_ids() {
        let mut est = ParametricEstimate::new("e1", inputs(10.0), PowerMode::Real).unwrap();
        let before = est.clone();
        let twice = [
            ScaleFactorRating {
                id: "team_cohesion".to_string(),
                rating: 1.0,
            },
            ScaleFactorRating {
                id: "team_cohesion".to_string(),
                rating: 2.0,
            },
        ];
        let err = est.apply_ratings(&twice, &[]).unwrap_err();
        assert!(matches!(
            err,
            EstimationError::Validation {
                field: "scale_factors",
                ..
            }
        ));
        assert_eq!(est, before);
    }

    #[test]
    fn test_set_power_mode_recomputes() {
        let mut est = ParametricEstimate::new("e1", inputs(10.0), PowerMode::Real).unwrap();
        est.set_power_mode(PowerMode::TruncatedLegacy).unwrap();
        assert_eq!(est.power_mode(), PowerMode::TruncatedLegacy);
        // exponent 0.91 truncates to zero multiplications
        assert!((est.effort_pm() - 2.45).abs() < 1e-12);
    }

    #[test]
    fn test_apply_ratings_updates_exponent() {
        let mut est = ParametricEstimate::new("e1", inputs(10.0), PowerMode::Real).unwrap();
        est.apply_ratings(
            &[ScaleFactorRating {
                id: "team_cohesion".to_string(),
                rating: 1.0,
            }],
            &[CostDriverRating {
                id: "product_complexity".to_string(),
                rating: 4.0,
                value: Some(1.34),
            }],
        )
        .unwrap();
        assert!((est.exponent_b() - (0.91 + 3.29)).abs() < 1e-12);
        assert_eq!(est.cost_drivers()[0].value, 1.34);
    }

    #[test]
    fn test_serializes_flat() {
        let est = ParametricEstimate::new("e1", inputs(10.0), PowerMode::Real).unwrap();
        let json = serde_json::to_value(&est).unwrap();
        assert_eq!(json["id"], "e1");
        assert_eq!(json["project_size"], 10.0);
        assert!(json.get("effort_pm").is_some());
        assert!(json.get("exponent_b").is_some());
        assert_eq!(json["power_mode"], "real");
    }
}
