//! Project-level estimate
//!
//! Global invariants enforced:
//! - `total_hours` always reflects the current process and parametric snapshots
//! - Recalculation is all-or-nothing: on error the estimate is left untouched

use crate::activity::{self, ProcessEstimate};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::factor::Factor;
use crate::parametric::ParametricEstimate;
use crate::reconcile::{self, Reconciliation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an estimate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateStatus {
    #[default]
    Draft,
    Completed,
    Approved,
}

/// Work-effort estimate for a whole project
///
/// Calculation inputs and the totals derived from them are private; they
/// change only through [`Estimate::set_inputs`] and [`Estimate::recalculate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Estimate {
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    process_estimates: Vec<ProcessEstimate>,
    global_factors: Vec<Factor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parametric: Option<ParametricEstimate>,
    total_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    reconciliation: Option<Reconciliation>,
    pub status: EstimateStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    pub notes: String,
}

impl Estimate {
    /// A draft estimate with nothing calculated yet
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Estimate {
            id: id.into(),
            project_id: project_id.into(),
            project_name: project_name.into(),
            process_estimates: Vec::new(),
            global_factors: Vec::new(),
            parametric: None,
            total_hours: 0.0,
            reconciliation: None,
            status: EstimateStatus::Draft,
            created_by: String::new(),
            created_at: now,
            updated_at: now,
            notes: String::new(),
        }
    }

    pub fn process_estimates(&self) -> &[ProcessEstimate] {
        &self.process_estimates
    }

    pub fn global_factors(&self) -> &[Factor] {
        &self.global_factors
    }

    pub fn parametric(&self) -> Option<&ParametricEstimate> {
        self.parametric.as_ref()
    }

    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    pub fn reconciliation(&self) -> Option<&Reconciliation> {
        self.reconciliation.as_ref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Recompute every process subtotal, the parametric estimate and the
    /// reconciled project total from the current inputs
    pub fn recalculate<C: Catalog + ?Sized>(&mut self, catalog: &C) -> Result<Reconciliation> {
        self.set_inputs(
            self.process_estimates.clone(),
            self.global_factors.clone(),
            self.parametric.clone(),
            catalog,
        )
    }

    /// Replace the calculation inputs and recompute the project total
    ///
    /// Everything is calculated before anything is stored; on error the
    /// estimate keeps its previous inputs and totals.
    pub fn set_inputs<C: Catalog + ?Sized>(
        &mut self,
        mut process_estimates: Vec<ProcessEstimate>,
        global_factors: Vec<Factor>,
        parametric: Option<ParametricEstimate>,
        catalog: &C,
    ) -> Result<Reconciliation> {
        let breakdown = activity::calculate(&process_estimates, &global_factors, catalog)?;

        let parametric = parametric
            .map(|mut p| p.recalculate().map(|()| p))
            .transpose()?;
        let parametric_result = parametric.as_ref().map(reconcile::parametric_result);
        let reconciliation = reconcile::reconcile(&breakdown.result, parametric_result.as_ref());

        for (pe, totals) in process_estimates.iter_mut().zip(&breakdown.processes) {
            pe.base_hours = totals.base_hours;
            pe.total_hours = totals.total_hours;
        }
        self.process_estimates = process_estimates;
        self.global_factors = global_factors;
        self.parametric = parametric;
        self.total_hours = reconciliation.total_hours;
        self.reconciliation = Some(reconciliation);
        self.updated_at = Utc::now();

        tracing::info!(
            estimate = %self.id,
            processes = self.process_estimates.len(),
            activity_hours = reconciliation.activity.total_hours,
            parametric_hours = ?parametric_result.map(|r| r.total_hours),
            total_hours = self.total_hours,
            "recalculated estimate"
        );
        Ok(reconciliation)
    }
}

/// Difference for one process between two estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessComparison {
    pub process_id: String,
    pub hours_a: f64,
    pub hours_b: f64,
    pub difference: f64,
}

/// Side-by-side comparison of two estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EstimateComparison {
    pub estimate_a: String,
    pub estimate_b: String,
    pub total_hours_a: f64,
    pub total_hours_b: f64,
    pub difference: f64,
    /// Relative change from A to B, `None` when A is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
    pub processes: Vec<ProcessComparison>,
}

/// Compare totals overall and per process
///
/// Processes appear in A's order followed by those only present in B.
pub fn compare(a: &Estimate, b: &Estimate) -> EstimateComparison {
    let hours = |e: &Estimate, id: &str| {
        e.process_estimates
            .iter()
            .filter(|pe| pe.process_id == id)
            .map(|pe| pe.total_hours)
            .sum::<f64>()
    };

    let mut ids: Vec<&str> = Vec::new();
    for pe in a.process_estimates.iter().chain(&b.process_estimates) {
        if !ids.contains(&pe.process_id.as_str()) {
            ids.push(&pe.process_id);
        }
    }

    let processes = ids
        .into_iter()
        .map(|id| {
            let hours_a = hours(a, id);
            let hours_b = hours(b, id);
            ProcessComparison {
                process_id: id.to_string(),
                hours_a,
                hours_b,
                difference: hours_b - hours_a,
            }
        })
        .collect();

    let difference = b.total_hours - a.total_hours;
    EstimateComparison {
        estimate_a: a.id.clone(),
        estimate_b: b.id.clone(),
        total_hours_a: a.total_hours,
        total_hours_b: b.total_hours,
        difference,
        percent_change: (a.total_hours != 0.0).then(|| difference / a.total_hours * 100.0),
        processes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{Activity, Process, ProcessCategory, Task};
    use crate::catalog::InMemoryCatalog;
    use crate::effort::PowerMode;
    use crate::factor::FactorType;
    use crate::parametric::{ParametricInputs, ParametricModel};

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::standard().with_processes(vec![Process {
            id: "impl".to_string(),
            category: ProcessCategory::Implementation,
            name: "Implementation".to_string(),
            description: String::new(),
            activities: vec![Activity {
                id: "coding".to_string(),
                name: "Coding".to_string(),
                description: String::new(),
                base_hours: 100.0,
                deliverables: vec!["source".to_string()],
            }],
            order: 5,
        }])
    }

    fn coding_task(activity: &str) -> Task {
        Task {
            id: "t1".to_string(),
            process_id: "impl".to_string(),
            activity_id: activity.to_string(),
            name: "coding".to_string(),
            description: String::new(),
            complexity: 1,
            scale: 1.0,
            dependencies: vec![],
            custom_factors: vec![],
        }
    }

    fn impl_tasks(tasks: Vec<Task>) -> Vec<ProcessEstimate> {
        vec![ProcessEstimate::new("impl", tasks)]
    }

    fn estimate(id: &str, task: Task) -> Estimate {
        let mut e = Estimate::new(id, "p1", "Billing");
        e.set_inputs(impl_tasks(vec![task]), vec![], None, &catalog()).unwrap();
        e
    }

    #[test]
    fn test_activity_only_total() {
        let mut e = Estimate::new("e1", "p1", "Billing");
        let r = e
            .set_inputs(
                impl_tasks(vec![coding_task("coding")]),
                vec![Factor::new("g", FactorType::RiskBuffer, "buffer", 1.2)],
                None,
                &catalog(),
            )
            .unwrap();
        assert!((e.total_hours() - 120.0).abs() < 1e-9);
        assert!((e.process_estimates()[0].base_hours - 100.0).abs() < 1e-9);
        assert!((e.process_estimates()[0].total_hours - 120.0).abs() < 1e-9);
        assert!(r.parametric.is_none());
        assert_eq!(e.reconciliation(), Some(&r));
    }

    #[test]
    fn test_with_parametric_blends_totals() {
        let p = ParametricEstimate::new(
            "p",
            ParametricInputs {
                project_size: 2.0,
                model: ParametricModel::early_design(),
                scale_factors: vec![],
                cost_drivers: vec![],
            },
            PowerMode::Real,
        )
        .unwrap();
        let parametric_hours = p.effort_pm() * 160.0;

        let mut e = Estimate::new("e1", "p1", "Billing");
        e.set_inputs(impl_tasks(vec![coding_task("coding")]), vec![], Some(p), &catalog())
            .unwrap();
        let expected = 100.0 * (0.8 / 1.65) + parametric_hours * (0.85 / 1.65);
        assert!((e.total_hours() - expected).abs() < 1e-6);
        let lo = f64::min(100.0, parametric_hours);
        let hi = f64::max(100.0, parametric_hours);
        assert!(e.total_hours() > lo && e.total_hours() < hi);
    }

    #[test]
    fn test_failed_set_inputs_leaves_estimate_untouched() {
        let mut e = estimate("e1", coding_task("coding"));
        let before = e.clone();

        let tasks = impl_tasks(vec![coding_task("coding"), coding_task("missing")]);
        assert!(e.set_inputs(tasks, vec![], None, &catalog()).is_err());
        assert_eq!(e, before);
    }

    #[test]
    fn test_recalculate_follows_catalog_changes() {
        let mut e = estimate("e1", coding_task("coding"));
        let mut process = catalog().processes()[0].clone();
        process.activities[0].base_hours = 60.0;
        let changed = InMemoryCatalog::standard().with_processes(vec![process]);

        e.recalculate(&changed).unwrap();
        assert!((e.total_hours() - 60.0).abs() < 1e-9);
        assert!((e.process_estimates()[0].base_hours - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_estimates() {
        let a = estimate("e1", coding_task("coding"));
        let mut harder = coding_task("coding");
        harder.complexity = 3;
        let b = estimate("e2", harder);

        let cmp = compare(&a, &b);
        assert!((cmp.difference - 40.0).abs() < 1e-9);
        assert!((cmp.percent_change.unwrap() - 40.0).abs() < 1e-9);
        assert_eq!(cmp.processes.len(), 1);
        assert!((cmp.processes[0].difference - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_with_zero_baseline() {
        let a = Estimate::new("a", "p", "x");
        let b = Estimate::new("b", "p", "x");
        assert!(compare(&a, &b).percent_change.is_none());
    }
}
