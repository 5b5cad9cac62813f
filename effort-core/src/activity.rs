//! Activity-based (bottom-up) estimation
//!
//! Task hours = activity.base_hours * task.scale * (0.8 + 0.2 * complexity),
//! then task factors, summed per process, then global factors per process.
//!
//! Global invariants enforced:
//! - Every referenced process and activity must resolve (all-or-nothing)
//! - Factors are applied in input order, every one of them
//! - Process order in the output matches the input order

use crate::catalog::Catalog;
use crate::effort::HOURS_PER_MONTH;
use crate::error::{EntityKind, EstimationError, Result};
use crate::factor::{self, Factor};
use crate::reconcile::{CalculationMethod, CalculationResult, ACTIVITY_CONFIDENCE, DEFAULT_TEAM_SIZE};
use serde::{Deserialize, Serialize};

pub const MIN_COMPLEXITY: u8 = 1;
pub const MAX_COMPLEXITY: u8 = 5;

/// Standard development process categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessCategory {
    RequirementDefinition,
    FunctionalSpecification,
    BasicDesign,
    DetailedDesign,
    Implementation,
    Testing,
    Delivery,
}

impl ProcessCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessCategory::RequirementDefinition => "requirement_definition",
            ProcessCategory::FunctionalSpecification => "functional_specification",
            ProcessCategory::BasicDesign => "basic_design",
            ProcessCategory::DetailedDesign => "detailed_design",
            ProcessCategory::Implementation => "implementation",
            ProcessCategory::Testing => "testing",
            ProcessCategory::Delivery => "delivery",
        }
    }
}

/// A standard activity within a process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_hours: f64,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

/// A development process and its catalog of activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    pub id: String,
    pub category: ProcessCategory,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub order: u32,
}

impl Process {
    pub fn find_activity(&self, activity_id: &str) -> Result<&Activity> {
        self.activities
            .iter()
            .find(|a| a.id == activity_id)
            .ok_or_else(|| EstimationError::not_found(EntityKind::Activity, activity_id))
    }
}

/// A unit of work referencing a catalog activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub process_id: String,
    pub activity_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub complexity: u8,
    pub scale: f64,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub custom_factors: Vec<Factor>,
}

/// Complexity multiplier `0.8 + 0.2 * complexity` (1 -> 1.0, 3 -> 1.4, 5 -> 1.8)
pub fn complexity_multiplier(complexity: u8) -> f64 {
    0.8 + 0.2 * f64::from(complexity)
}

impl Task {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_COMPLEXITY..=MAX_COMPLEXITY).contains(&self.complexity) {
            return Err(EstimationError::validation(
                "task complexity",
                format!(
                    "must be between {MIN_COMPLEXITY} and {MAX_COMPLEXITY} (got {})",
                    self.complexity
                ),
            ));
        }
        if self.scale.is_nan() || self.scale < 0.0 || self.scale.is_infinite() {
            return Err(EstimationError::validation(
                "task scale",
                format!("must be a non-negative number (got {})", self.scale),
            ));
        }
        for f in &self.custom_factors {
            f.validate()?;
        }
        Ok(())
    }

    /// Hours before task factors are applied
    pub fn base_hours(&self, activity: &Activity) -> f64 {
        activity.base_hours * self.scale * complexity_multiplier(self.complexity)
    }

    /// Hours after this task's own factors
    pub fn adjusted_hours(&self, activity: &Activity) -> f64 {
        factor::apply_all(self.base_hours(activity), &self.custom_factors)
    }
}

/// Per-process slice of a project estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessEstimate {
    pub process_id: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Sum of task hours before global factors
    #[serde(default)]
    pub base_hours: f64,
    /// Hours after global factors
    #[serde(default)]
    pub total_hours: f64,
}

impl ProcessEstimate {
    pub fn new(process_id: impl Into<String>, tasks: Vec<Task>) -> Self {
        ProcessEstimate {
            process_id: process_id.into(),
            tasks,
            base_hours: 0.0,
            total_hours: 0.0,
        }
    }
}

/// Computed subtotal for one process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessTotals {
    pub base_hours: f64,
    pub total_hours: f64,
}

/// Outcome of the activity-based calculation
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityBreakdown {
    /// One entry per input process estimate, same order
    pub processes: Vec<ProcessTotals>,
    pub result: CalculationResult,
}

/// Summary derived from a project-wide hour total
pub fn activity_result(total_hours: f64) -> CalculationResult {
    let person_months = total_hours / HOURS_PER_MONTH;
    CalculationResult {
        method: CalculationMethod::ActivityBased,
        total_hours,
        person_months,
        team_size: DEFAULT_TEAM_SIZE,
        duration_months: person_months / DEFAULT_TEAM_SIZE,
        confidence: ACTIVITY_CONFIDENCE,
    }
}

fn process_totals<C: Catalog + ?Sized>(
    estimate: &ProcessEstimate,
    global_factors: &[Factor],
    catalog: &C,
) -> Result<ProcessTotals> {
    let process = catalog.find_process(&estimate.process_id)?;

    let mut base_hours = 0.0;
    for task in &estimate.tasks {
        if task.process_id != estimate.process_id {
            return Err(EstimationError::validation(
                "task process_id",
                format!(
                    "task {:?} references process {:?} but is listed under {:?}",
                    task.id, task.process_id, estimate.process_id
                ),
            ));
        }
        task.validate()?;
        let activity = process.find_activity(&task.activity_id)?;
        base_hours += task.adjusted_hours(activity);
    }

    let total_hours = factor::apply_all(base_hours, global_factors);
    tracing::debug!(
        process = %estimate.process_id,
        tasks = estimate.tasks.len(),
        base_hours,
        total_hours,
        "computed process subtotal"
    );
    Ok(ProcessTotals {
        base_hours,
        total_hours,
    })
}

/// Run the activity-based calculation without touching the inputs
pub fn calculate<C: Catalog + ?Sized>(
    process_estimates: &[ProcessEstimate],
    global_factors: &[Factor],
    catalog: &C,
) -> Result<ActivityBreakdown> {
    for f in global_factors {
        f.validate()?;
    }

    let processes = process_estimates
        .iter()
        .map(|pe| process_totals(pe, global_factors, catalog))
        .collect::<Result<Vec<_>>>()?;

    let project_total: f64 = processes.iter().map(|p| p.total_hours).sum();
    Ok(ActivityBreakdown {
        processes,
        result: activity_result(project_total),
    })
}
