//! Service tests - persistence failures, all-or-nothing updates and shared catalogs

use effort_core::catalog::{InMemoryCatalog, MemoryStore, ParametricStore};
use effort_core::error::{EntityKind, EstimationError, Result};
use effort_core::parametric::{CostDriverRating, ScaleFactorRating};
use effort_core::service::ParametricRequest;
use effort_core::{ParametricEstimate, ParametricService};
use std::sync::Arc;

/// Store whose writes always fail
struct ReadOnlyStore;

impl ParametricStore for ReadOnlyStore {
    fn save_parametric(&self, _estimate: &ParametricEstimate) -> Result<()> {
        Err(EstimationError::Storage("read-only store".to_string()))
    }

    fn find_parametric(&self, id: &str) -> Result<ParametricEstimate> {
        Err(EstimationError::not_found(EntityKind::ParametricEstimate, id))
    }
}

fn request(id: &str, size: f64) -> ParametricRequest {
    ParametricRequest {
        id: id.to_string(),
        model_id: "post_architecture".to_string(),
        project_size: size,
        scale_factors: vec![
            ScaleFactorRating {
                id: "architecture_risk".to_string(),
                rating: 0.02,
            },
            ScaleFactorRating {
                id: "team_cohesion".to_string(),
                rating: 0.01,
            },
        ],
        cost_drivers: vec![CostDriverRating {
            id: "analyst_capability".to_string(),
            rating: 2.0,
            value: Some(0.85),
        }],
    }
}

#[test]
fn test_storage_errors_propagate_unchanged() {
    let catalog = InMemoryCatalog::standard();
    let err = ParametricService::new(&catalog, &ReadOnlyStore)
        .create(&request("p1", 12.0))
        .unwrap_err();
    assert_eq!(err, EstimationError::Storage("read-only store".to_string()));
    assert_eq!(err.to_string(), "storage error: read-only store");
}

#[test]
fn test_unknown_model_is_not_found() {
    let catalog = InMemoryCatalog::standard();
    let store = MemoryStore::new();
    let mut r = request("p1", 12.0);
    r.model_id = "intermediate".to_string();
    let err = ParametricService::new(&catalog, &store).create(&r).unwrap_err();
    assert_eq!(err, EstimationError::not_found(EntityKind::Model, "intermediate"));
}

#[test]
fn test_update_ratings_failure_keeps_saved_estimate() {
    let catalog = InMemoryCatalog::standard();
    let store = MemoryStore::new();
    let service = ParametricService::new(&catalog, &store);
    let created = service.create(&request("p1", 12.0)).unwrap();

    let err = service
        .update_ratings(
            "p1",
            &[ScaleFactorRating {
                id: "architecture_risk".to_string(),
                rating: 0.04,
            }],
            &[CostDriverRating {
                id: "database_size".to_string(),
                rating: 1.0,
                value: None,
            }],
        )
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.find_parametric("p1").unwrap(), created);
}

#[test]
fn test_update_ratings_rejects_out_of_range() {
    let catalog = InMemoryCatalog::standard();
    let store = MemoryStore::new();
    let service = ParametricService::new(&catalog, &store);
    let created = service.create(&request("p1", 12.0)).unwrap();

    let err = service
        .update_ratings(
            "p1",
            &[ScaleFactorRating {
                id: "team_cohesion".to_string(),
                rating: 5.5,
            }],
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, EstimationError::Validation { .. }));
    assert_eq!(service.get("p1").unwrap(), created);
}

fn all_scale_factors(rating: f64) -> Vec<ScaleFactorRating> {
    [
        "precedentedness",
        "development_flexibility",
        "architecture_risk",
        "team_cohesion",
        "process_maturity",
    ]
    .iter()
    .map(|id| ScaleFactorRating {
        id: id.to_string(),
        rating,
    })
    .collect()
}

#[test]
fn test_overflowing_ratings_are_rejected_and_not_saved() {
    let catalog = InMemoryCatalog::standard();
    let store = MemoryStore::new();
    let service = ParametricService::new(&catalog, &store);
    let r = ParametricRequest {
        id: "huge".to_string(),
        model_id: "early_design".to_string(),
        project_size: 10.0,
        scale_factors: all_scale_factors(5.0),
        cost_drivers: vec![],
    };

    let err = service.create(&r).unwrap_err();
    assert!(matches!(
        err,
        EstimationError::Validation {
            field: "project_size",
            ..
        }
    ));
    assert!(store.find_parametric("huge").unwrap_err().is_not_found());
}

#[test]
fn test_update_ratings_overflow_keeps_saved_estimate() {
    let catalog = InMemoryCatalog::standard();
    let store = MemoryStore::new();
    let service = ParametricService::new(&catalog, &store);
    let mut r = request("p1", 10.0);
    r.scale_factors = all_scale_factors(0.0);
    let created = service.create(&r).unwrap();

    let err = service.update_ratings("p1", &all_scale_factors(5.0), &[]).unwrap_err();
    assert!(matches!(err, EstimationError::Validation { .. }));
    assert_eq!(service.get("p1").unwrap(), created);
    assert!(created.duration_months().is_finite());
}

#[test]
fn test_shared_catalog_across_threads() {
    let catalog = Arc::new(InMemoryCatalog::standard());
    let store = Arc::new(MemoryStore::new());

    let handles: Vec<_> = (1..=8)
        .map(|i| {
            let catalog = Arc::clone(&catalog);
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                ParametricService::new(catalog.as_ref(), store.as_ref())
                    .create(&request(&format!("p{i}"), f64::from(i) * 5.0))
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<ParametricEstimate> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, concurrent) in (1..=8).zip(&results) {
        let sequential = ParametricService::new(catalog.as_ref(), &MemoryStore::new())
            .evaluate(&request(&format!("p{i}"), f64::from(i) * 5.0))
            .unwrap();
        assert_eq!(concurrent.effort(), sequential.effort());
        assert_eq!(&store.find_parametric(&format!("p{i}")).unwrap(), concurrent);
    }
}
