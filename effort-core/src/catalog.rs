//! Catalog lookups and persistence seams
//!
//! The engine reads models, scale factors, cost drivers, processes and
//! factors through [`Catalog`] and writes results through the store traits.
//! Lookups hand back owned copies so a computation never shares mutable
//! state with another.

use crate::activity::Process;
use crate::error::{EntityKind, EstimationError, Result};
use crate::estimate::Estimate;
use crate::factor::Factor;
use crate::parametric::{
    CostDriver, CostDriverType, ParametricEstimate, ParametricModel, ScaleFactor, ScaleFactorType,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Read-only catalog of reference data
pub trait Catalog {
    fn find_model(&self, id: &str) -> Result<ParametricModel>;
    fn find_scale_factor(&self, id: &str) -> Result<ScaleFactor>;
    fn find_cost_driver(&self, id: &str) -> Result<CostDriver>;
    fn find_process(&self, id: &str) -> Result<Process>;
    fn find_factor(&self, id: &str) -> Result<Factor>;
}

pub trait EstimateStore {
    fn save_estimate(&self, estimate: &Estimate) -> Result<()>;
    fn update_estimate(&self, estimate: &Estimate) -> Result<()>;
    fn find_estimate(&self, id: &str) -> Result<Estimate>;
    fn find_estimates_by_project(&self, project_id: &str) -> Result<Vec<Estimate>>;
}

pub trait ParametricStore {
    fn save_parametric(&self, estimate: &ParametricEstimate) -> Result<()>;
    fn find_parametric(&self, id: &str) -> Result<ParametricEstimate>;
}

pub trait ProcessStore {
    fn save_process(&self, process: &Process) -> Result<()>;
    fn update_process(&self, process: &Process) -> Result<()>;
    fn find_process(&self, id: &str) -> Result<Process>;
}

pub trait FactorStore {
    fn save_factor(&self, factor: &Factor) -> Result<()>;
    fn update_factor(&self, factor: &Factor) -> Result<()>;
    fn find_factor(&self, id: &str) -> Result<Factor>;
}

/// Immutable in-memory catalog
///
/// Entries keep their insertion order for listing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    models: Vec<ParametricModel>,
    scale_factors: Vec<ScaleFactor>,
    cost_drivers: Vec<CostDriver>,
    processes: Vec<Process>,
    factors: Vec<Factor>,
}

impl InMemoryCatalog {
    /// Both model variants, the five scale factors and all cost drivers at nominal
    pub fn standard() -> Self {
        InMemoryCatalog {
            models: vec![
                ParametricModel::early_design(),
                ParametricModel::post_architecture(),
            ],
            scale_factors: ScaleFactorType::ALL
                .iter()
                .map(|t| ScaleFactor::standard(*t))
                .collect(),
            cost_drivers: CostDriverType::ALL
                .iter()
                .map(|t| CostDriver::standard(*t))
                .collect(),
            processes: Vec::new(),
            factors: Vec::new(),
        }
    }

    pub fn with_processes(mut self, processes: Vec<Process>) -> Self {
        self.processes.extend(processes);
        self.processes.sort_by_key(|p| p.order);
        self
    }

    pub fn with_factors(mut self, factors: Vec<Factor>) -> Self {
        self.factors.extend(factors);
        self
    }

    pub fn with_models(mut self, models: Vec<ParametricModel>) -> Self {
        self.models.extend(models);
        self
    }

    pub fn models(&self) -> &[ParametricModel] {
        &self.models
    }

    pub fn scale_factors(&self) -> &[ScaleFactor] {
        &self.scale_factors
    }

    pub fn cost_drivers(&self) -> &[CostDriver] {
        &self.cost_drivers
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }
}

fn lookup<T: Clone>(items: &[T], kind: EntityKind, id: &str, key: impl Fn(&T) -> &str) -> Result<T> {
    items
        .iter()
        .find(|item| key(item) == id)
        .cloned()
        .ok_or_else(|| EstimationError::not_found(kind, id))
}

impl Catalog for InMemoryCatalog {
    fn find_model(&self, id: &str) -> Result<ParametricModel> {
        lookup(&self.models, EntityKind::Model, id, |m| m.id.as_str())
    }

    fn find_scale_factor(&self, id: &str) -> Result<ScaleFactor> {
        lookup(&self.scale_factors, EntityKind::ScaleFactor, id, |sf| sf.id.as_str())
    }

    fn find_cost_driver(&self, id: &str) -> Result<CostDriver> {
        lookup(&self.cost_drivers, EntityKind::CostDriver, id, |cd| cd.id.as_str())
    }

    fn find_process(&self, id: &str) -> Result<Process> {
        lookup(&self.processes, EntityKind::Process, id, |p| p.id.as_str())
    }

    fn find_factor(&self, id: &str) -> Result<Factor> {
        lookup(&self.factors, EntityKind::Factor, id, |f| f.id.as_str())
    }
}

/// Catalog view over a store: processes and factors saved in the store win
/// over the base catalog's entries, everything else comes from the base
pub struct StoreCatalog<'a, C: ?Sized, S: ?Sized> {
    base: &'a C,
    store: &'a S,
}

impl<'a, C: ?Sized, S: ?Sized> StoreCatalog<'a, C, S> {
    pub fn new(base: &'a C, store: &'a S) -> Self {
        StoreCatalog { base, store }
    }
}

/// Use `stored` unless it is NotFound, then fall back to `base`
pub(crate) fn stored_or<T>(stored: Result<T>, base: impl FnOnce() -> Result<T>) -> Result<T> {
    match stored {
        Err(e) if e.is_not_found() => base(),
        other => other,
    }
}

impl<C, S> Catalog for StoreCatalog<'_, C, S>
where
    C: Catalog + ?Sized,
    S: ProcessStore + FactorStore + ?Sized,
{
    fn find_model(&self, id: &str) -> Result<ParametricModel> {
        self.base.find_model(id)
    }

    fn find_scale_factor(&self, id: &str) -> Result<ScaleFactor> {
        self.base.find_scale_factor(id)
    }

    fn find_cost_driver(&self, id: &str) -> Result<CostDriver> {
        self.base.find_cost_driver(id)
    }

    fn find_process(&self, id: &str) -> Result<Process> {
        stored_or(self.store.find_process(id), || self.base.find_process(id))
    }

    fn find_factor(&self, id: &str) -> Result<Factor> {
        stored_or(self.store.find_factor(id), || self.base.find_factor(id))
    }
}

/// Mutex-guarded in-memory persistence
#[derive(Debug, Default)]
pub struct MemoryStore {
    estimates: Mutex<HashMap<String, Estimate>>,
    parametric: Mutex<HashMap<String, ParametricEstimate>>,
    processes: Mutex<HashMap<String, Process>>,
    factors: Mutex<HashMap<String, Factor>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn guard<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|_| EstimationError::Storage("store lock poisoned".to_string()))
}

fn update_existing<T: Clone>(
    m: &Mutex<HashMap<String, T>>,
    kind: EntityKind,
    id: &str,
    value: &T,
) -> Result<()> {
    let mut map = guard(m)?;
    match map.get_mut(id) {
        Some(slot) => {
            *slot = value.clone();
            Ok(())
        }
        None => Err(EstimationError::not_found(kind, id)),
    }
}

impl EstimateStore for MemoryStore {
    fn save_estimate(&self, estimate: &Estimate) -> Result<()> {
        guard(&self.estimates)?.insert(estimate.id.clone(), estimate.clone());
        Ok(())
    }

    fn update_estimate(&self, estimate: &Estimate) -> Result<()> {
        update_existing(&self.estimates, EntityKind::Estimate, &estimate.id, estimate)
    }

    fn find_estimate(&self, id: &str) -> Result<Estimate> {
        guard(&self.estimates)?
            .get(id)
            .cloned()
            .ok_or_else(|| EstimationError::not_found(EntityKind::Estimate, id))
    }

    fn find_estimates_by_project(&self, project_id: &str) -> Result<Vec<Estimate>> {
        let mut found: Vec<Estimate> = guard(&self.estimates)?
            .values()
            .filter(|e| e.project_id == project_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }
}

impl ParametricStore for MemoryStore {
    fn save_parametric(&self, estimate: &ParametricEstimate) -> Result<()> {
        guard(&self.parametric)?.insert(estimate.id().to_string(), estimate.clone());
        Ok(())
    }

    fn find_parametric(&self, id: &str) -> Result<ParametricEstimate> {
        guard(&self.parametric)?
            .get(id)
            .cloned()
            .ok_or_else(|| EstimationError::not_found(EntityKind::ParametricEstimate, id))
    }
}

impl ProcessStore for MemoryStore {
    fn save_process(&self, process: &Process) -> Result<()> {
        guard(&self.processes)?.insert(process.id.clone(), process.clone());
        Ok(())
    }

    fn update_process(&self, process: &Process) -> Result<()> {
        update_existing(&self.processes, EntityKind::Process, &process.id, process)
    }

    fn find_process(&self, id: &str) -> Result<Process> {
        guard(&self.processes)?
            .get(id)
            .cloned()
            .ok_or_else(|| EstimationError::not_found(EntityKind::Process, id))
    }
}

impl FactorStore for MemoryStore {
    fn save_factor(&self, factor: &Factor) -> Result<()> {
        guard(&self.factors)?.insert(factor.id.clone(), factor.clone());
        Ok(())
    }

    fn update_factor(&self, factor: &Factor) -> Result<()> {
        update_existing(&self.factors, EntityKind::Factor, &factor.id, factor)
    }

    fn find_factor(&self, id: &str) -> Result<Factor> {
        guard(&self.factors)?
            .get(id)
            .cloned()
            .ok_or_else(|| EstimationError::not_found(EntityKind::Factor, id))
    }
}
