//! Use-case services wiring the engine to the catalog and stores
//!
//! Every request is validated and every referenced id resolved before any
//! arithmetic happens; a failed lookup aborts the whole request and nothing
//! is saved.

use crate::activity::{Activity, Process, ProcessEstimate, Task};
use crate::catalog::{
    stored_or, Catalog, EstimateStore, FactorStore, ParametricStore, ProcessStore, StoreCatalog,
};
use crate::detailed::{self, DetailedResult};
use crate::effort::PowerMode;
use crate::error::{require_non_empty, EntityKind, EstimationError, Result};
use crate::estimate::{self, Estimate, EstimateComparison};
use crate::factor::Factor;
use crate::parametric::{
    reject_duplicates, validate_project_size, validate_rating, CostDriverRating,
    ParametricEstimate, ParametricInputs, ScaleFactorRating,
};
use serde::{Deserialize, Serialize};

/// Request for a new parametric estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParametricRequest {
    pub id: String,
    pub model_id: String,
    pub project_size: f64,
    #[serde(default)]
    pub scale_factors: Vec<ScaleFactorRating>,
    #[serde(default)]
    pub cost_drivers: Vec<CostDriverRating>,
}

/// Resolve a request into fully validated calculation inputs
pub fn resolve_inputs<C: Catalog + ?Sized>(
    catalog: &C,
    request: &ParametricRequest,
) -> Result<ParametricInputs> {
    validate_project_size(request.project_size)?;
    require_non_empty("model_id", &request.model_id)?;
    reject_duplicates(
        "scale_factors",
        request.scale_factors.iter().map(|r| r.id.as_str()),
    )?;
    reject_duplicates(
        "cost_drivers",
        request.cost_drivers.iter().map(|r| r.id.as_str()),
    )?;

    let model = catalog.find_model(&request.model_id)?;

    let scale_factors = request
        .scale_factors
        .iter()
        .map(|r| {
            validate_rating("scale factor rating", r.rating)?;
            let mut sf = catalog.find_scale_factor(&r.id)?;
            sf.rating = r.rating;
            Ok(sf)
        })
        .collect::<Result<Vec<_>>>()?;

    let cost_drivers = request
        .cost_drivers
        .iter()
        .map(|r| {
            validate_rating("cost driver rating", r.rating)?;
            let mut cd = catalog.find_cost_driver(&r.id)?;
            cd.rating = r.rating;
            if let Some(value) = r.value {
                cd.value = value;
            }
            Ok(cd)
        })
        .collect::<Result<Vec<_>>>()?;

    let inputs = ParametricInputs {
        project_size: request.project_size,
        model,
        scale_factors,
        cost_drivers,
    };
    inputs.validate()?;
    Ok(inputs)
}

/// Create, re-rate and report on parametric estimates
pub struct ParametricService<'a, C: ?Sized, S: ?Sized> {
    catalog: &'a C,
    store: &'a S,
    power_mode: PowerMode,
}

impl<'a, C, S> ParametricService<'a, C, S>
where
    C: Catalog + ?Sized,
    S: ParametricStore + ?Sized,
{
    pub fn new(catalog: &'a C, store: &'a S) -> Self {
        ParametricService {
            catalog,
            store,
            power_mode: PowerMode::default(),
        }
    }

    pub fn with_power_mode(mut self, mode: PowerMode) -> Self {
        self.power_mode = mode;
        self
    }

    /// Compute an estimate without saving it
    pub fn evaluate(&self, request: &ParametricRequest) -> Result<ParametricEstimate> {
        let inputs = resolve_inputs(self.catalog, request).map_err(|e| {
            tracing::warn!(request = %request.id, error = %e, "rejected parametric request");
            e
        })?;
        ParametricEstimate::new(request.id.clone(), inputs, self.power_mode)
    }

    /// Compute and save an estimate
    pub fn create(&self, request: &ParametricRequest) -> Result<ParametricEstimate> {
        let estimate = self.evaluate(request)?;
        self.store.save_parametric(&estimate)?;
        tracing::info!(
            estimate = %estimate.id(),
            model = %estimate.model().id,
            effort_pm = estimate.effort_pm(),
            "created parametric estimate"
        );
        Ok(estimate)
    }

    /// Re-rate factors on a saved estimate, recompute and save
    pub fn update_ratings(
        &self,
        id: &str,
        scale_factors: &[ScaleFactorRating],
        cost_drivers: &[CostDriverRating],
    ) -> Result<ParametricEstimate> {
        let mut estimate = self.store.find_parametric(id)?;
        estimate.apply_ratings(scale_factors, cost_drivers)?;
        self.store.save_parametric(&estimate)?;
        Ok(estimate)
    }

    pub fn get(&self, id: &str) -> Result<ParametricEstimate> {
        self.store.find_parametric(id)
    }

    /// Detailed report for a saved estimate
    pub fn detailed(&self, id: &str, hourly_rate: Option<f64>) -> Result<DetailedResult> {
        let estimate = self.store.find_parametric(id)?;
        detailed::generate(&estimate, hourly_rate)
    }
}

/// Create and update adjustment factors
pub struct FactorService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: FactorStore + ?Sized> FactorService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        FactorService { store }
    }

    pub fn create(&self, factor: &Factor) -> Result<()> {
        require_non_empty("factor id", &factor.id)?;
        factor.validate()?;
        self.store.save_factor(factor)
    }

    pub fn update(&self, factor: &Factor) -> Result<()> {
        require_non_empty("factor id", &factor.id)?;
        factor.validate()?;
        self.store.find_factor(&factor.id)?;
        self.store.update_factor(factor)
    }

    pub fn get(&self, id: &str) -> Result<Factor> {
        self.store.find_factor(id)
    }
}

/// Maintain process catalogs
pub struct ProcessService<'a, C: ?Sized, S: ?Sized> {
    catalog: &'a C,
    store: &'a S,
}

impl<'a, C, S> ProcessService<'a, C, S>
where
    C: Catalog + ?Sized,
    S: ProcessStore + ?Sized,
{
    pub fn new(catalog: &'a C, store: &'a S) -> Self {
        ProcessService { catalog, store }
    }

    /// Current revision of a process: the stored one, else the catalog entry
    pub fn get(&self, id: &str) -> Result<Process> {
        stored_or(self.store.find_process(id), || self.catalog.find_process(id))
    }

    /// Replace a process known to the store or the catalog
    pub fn update_process(&self, process: &Process) -> Result<()> {
        require_non_empty("process id", &process.id)?;
        require_non_empty("process name", &process.name)?;
        match self.store.update_process(process) {
            Err(e) if e.is_not_found() => {
                self.catalog.find_process(&process.id)?;
                self.store.save_process(process)
            }
            other => other,
        }
    }

    /// Replace one activity of the current process revision, keeping the rest
    pub fn update_activity(&self, process_id: &str, activity: Activity) -> Result<Process> {
        let activity_id = activity.id.clone();
        let mut process = self.get(process_id)?;
        let slot = process
            .activities
            .iter_mut()
            .find(|a| a.id == activity.id)
            .ok_or_else(|| EstimationError::not_found(EntityKind::Activity, &activity.id))?;
        *slot = activity;
        self.store.save_process(&process)?;
        tracing::info!(process = %process.id, activity = %activity_id, "updated activity");
        Ok(process)
    }
}

/// Request for a new project estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimateRequest {
    pub id: String,
    pub project_id: String,
    pub project_name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Ids of project-wide factors, applied in order
    #[serde(default)]
    pub global_factors: Vec<String>,
    #[serde(default)]
    pub parametric: Option<ParametricRequest>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub notes: String,
}

/// Replacement inputs for an existing project estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimateUpdate {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub global_factors: Vec<String>,
    #[serde(default)]
    pub parametric: Option<ParametricRequest>,
    #[serde(default)]
    pub notes: String,
}

/// Group tasks by process, keeping first-seen process order
pub fn group_tasks(tasks: &[Task]) -> Vec<ProcessEstimate> {
    let mut groups: Vec<ProcessEstimate> = Vec::new();
    for task in tasks {
        match groups.iter_mut().find(|g| g.process_id == task.process_id) {
            Some(group) => group.tasks.push(task.clone()),
            None => groups.push(ProcessEstimate::new(task.process_id.clone(), vec![task.clone()])),
        }
    }
    groups
}

/// Every task names its process and activity and carries valid ratings
fn validate_tasks(tasks: &[Task]) -> Result<()> {
    for task in tasks {
        require_non_empty("task process_id", &task.process_id)?;
        require_non_empty("task activity_id", &task.activity_id)?;
        task.validate()?;
    }
    Ok(())
}

/// Create, update, report on and compare project estimates
///
/// Processes and factors are read through a [`StoreCatalog`], so revisions
/// saved by [`ProcessService`] and [`FactorService`] reach the next
/// calculation.
pub struct EstimateService<'a, C: ?Sized, S: ?Sized> {
    catalog: &'a C,
    store: &'a S,
    power_mode: PowerMode,
}

impl<'a, C, S> EstimateService<'a, C, S>
where
    C: Catalog + ?Sized,
    S: EstimateStore + ProcessStore + FactorStore + ?Sized,
{
    pub fn new(catalog: &'a C, store: &'a S) -> Self {
        EstimateService {
            catalog,
            store,
            power_mode: PowerMode::default(),
        }
    }

    pub fn with_power_mode(mut self, mode: PowerMode) -> Self {
        self.power_mode = mode;
        self
    }

    fn catalog(&self) -> StoreCatalog<'a, C, S> {
        StoreCatalog::new(self.catalog, self.store)
    }

    fn resolve_factors(&self, ids: &[String]) -> Result<Vec<Factor>> {
        let catalog = self.catalog();
        ids.iter().map(|id| catalog.find_factor(id)).collect()
    }

    fn resolve_parametric(
        &self,
        request: Option<&ParametricRequest>,
    ) -> Result<Option<ParametricEstimate>> {
        request
            .map(|r| {
                let inputs = resolve_inputs(&self.catalog(), r)?;
                ParametricEstimate::new(r.id.clone(), inputs, self.power_mode)
            })
            .transpose()
    }

    /// Build and calculate an estimate without saving it
    pub fn evaluate(&self, request: &EstimateRequest) -> Result<Estimate> {
        require_non_empty("estimate id", &request.id)?;
        require_non_empty("project_id", &request.project_id)?;
        require_non_empty("project_name", &request.project_name)?;
        validate_tasks(&request.tasks)?;

        let global_factors = self.resolve_factors(&request.global_factors)?;
        let parametric = self.resolve_parametric(request.parametric.as_ref())?;
        let mut estimate = Estimate::new(
            request.id.clone(),
            request.project_id.clone(),
            request.project_name.clone(),
        );
        estimate.created_by = request.created_by.clone();
        estimate.notes = request.notes.clone();
        estimate.set_inputs(
            group_tasks(&request.tasks),
            global_factors,
            parametric,
            &self.catalog(),
        )?;
        Ok(estimate)
    }

    /// Build, calculate and save an estimate
    pub fn create(&self, request: &EstimateRequest) -> Result<Estimate> {
        let estimate = self.evaluate(request).map_err(|e| {
            tracing::warn!(estimate = %request.id, error = %e, "rejected estimate request");
            e
        })?;
        self.store.save_estimate(&estimate)?;
        tracing::info!(
            estimate = %estimate.id,
            project = %estimate.project_id,
            total_hours = estimate.total_hours(),
            "created estimate"
        );
        Ok(estimate)
    }

    /// Replace tasks, factors and parametric inputs, then recalculate
    pub fn update(&self, id: &str, update: &EstimateUpdate) -> Result<Estimate> {
        validate_tasks(&update.tasks)?;
        let mut estimate = self.store.find_estimate(id)?;
        let global_factors = self.resolve_factors(&update.global_factors)?;
        let parametric = self.resolve_parametric(update.parametric.as_ref())?;
        estimate.set_inputs(
            group_tasks(&update.tasks),
            global_factors,
            parametric,
            &self.catalog(),
        )?;
        estimate.notes = update.notes.clone();
        self.store.update_estimate(&estimate)?;
        Ok(estimate)
    }

    /// Recalculate a saved estimate against the current processes and factors
    pub fn recalculate(&self, id: &str) -> Result<Estimate> {
        let mut estimate = self.store.find_estimate(id)?;
        estimate.recalculate(&self.catalog())?;
        self.store.update_estimate(&estimate)?;
        Ok(estimate)
    }

    pub fn get(&self, id: &str) -> Result<Estimate> {
        self.store.find_estimate(id)
    }

    pub fn project_estimates(&self, project_id: &str) -> Result<Vec<Estimate>> {
        self.store.find_estimates_by_project(project_id)
    }

    /// A saved estimate plus the detailed parametric report, if it has one
    pub fn detailed(
        &self,
        id: &str,
        hourly_rate: Option<f64>,
    ) -> Result<(Estimate, Option<DetailedResult>)> {
        let estimate = self.store.find_estimate(id)?;
        let details = estimate
            .parametric()
            .map(|p| detailed::generate(p, hourly_rate))
            .transpose()?;
        Ok((estimate, details))
    }

    pub fn compare(&self, id_a: &str, id_b: &str) -> Result<EstimateComparison> {
        let a = self.store.find_estimate(id_a)?;
        let b = self.store.find_estimate(id_b)?;
        Ok(estimate::compare(&a, &b))
    }
}
