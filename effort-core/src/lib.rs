//! Effortline core library - parametric and activity-based software effort estimation

// Global invariants enforced in this crate:
// - Every calculation is a pure function of its resolved inputs
// - No global mutable state; catalogs are shared by reference
// - Derived effort values always match the inputs they were computed from
// - Derived effort values are finite; inputs that overflow are rejected unchanged
// - Every referenced id resolves before any arithmetic (all-or-nothing)
// - Factor and process order follow the caller's order

pub mod activity;
pub mod catalog;
pub mod config;
pub mod detailed;
pub mod effort;
pub mod error;
pub mod estimate;
pub mod factor;
pub mod parametric;
pub mod reconcile;
pub mod report;
pub mod service;

pub use catalog::{Catalog, InMemoryCatalog, MemoryStore, StoreCatalog};
pub use config::ResolvedConfig;
pub use detailed::DetailedResult;
pub use effort::{Effort, PowerMode};
pub use error::{EstimationError, Result};
pub use estimate::Estimate;
pub use parametric::{ParametricEstimate, ParametricInputs};
pub use service::{
    EstimateRequest, EstimateService, FactorService, ParametricRequest, ParametricService,
    ProcessService,
};

/// Compute a parametric estimate and its detailed report in one call
pub fn estimate_parametric<C: Catalog + ?Sized>(
    catalog: &C,
    request: &ParametricRequest,
    power_mode: PowerMode,
    hourly_rate: Option<f64>,
) -> Result<(ParametricEstimate, DetailedResult)> {
    let inputs = service::resolve_inputs(catalog, request)?;
    let estimate = ParametricEstimate::new(request.id.clone(), inputs, power_mode)?;
    let details = detailed::generate(&estimate, hourly_rate)?;
    Ok((estimate, details))
}
