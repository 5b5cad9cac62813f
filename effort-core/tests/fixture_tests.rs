//! Fixture tests - end-to-end estimates from JSON inputs

use effort_core::activity::Process;
use effort_core::catalog::{EstimateStore, InMemoryCatalog, MemoryStore};
use effort_core::factor::Factor;
use effort_core::service::{EstimateRequest, ParametricRequest};
use effort_core::{report, EstimateService, ParametricService, PowerMode};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join("estimation")
        .join(name)
}

fn read_fixture<T: DeserializeOwned>(name: &str) -> T {
    let path = fixture_path(name);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

fn portal_catalog() -> InMemoryCatalog {
    let processes: Vec<Process> = read_fixture("portal_processes.json");
    let factors: Vec<Factor> = read_fixture("portal_factors.json");
    InMemoryCatalog::standard()
        .with_processes(processes)
        .with_factors(factors)
}

#[test]
fn test_extreme_exponent_regression() {
    let request: ParametricRequest = read_fixture("extreme_exponent.json");
    let catalog = InMemoryCatalog::standard();
    let store = MemoryStore::new();
    let estimate = ParametricService::new(&catalog, &store)
        .create(&request)
        .unwrap();

    assert!((estimate.exponent_b() - 13.06).abs() < 1e-9);
    let expected = 2.94 * 50f64.powf(0.91 + 4.05 * 3.0);
    assert!((estimate.effort_pm() - expected).abs() / expected < 1e-12);
    assert!(estimate.effort_pm() > 4.53e22 && estimate.effort_pm() < 4.55e22);
    assert!(
        (estimate.team_size() * estimate.duration_months() - estimate.effort_pm()).abs()
            / estimate.effort_pm()
            < 1e-9
    );
}

#[test]
fn test_extreme_exponent_legacy_mode() {
    let request: ParametricRequest = read_fixture("extreme_exponent.json");
    let catalog = InMemoryCatalog::standard();
    let store = MemoryStore::new();
    let estimate = ParametricService::new(&catalog, &store)
        .with_power_mode(PowerMode::TruncatedLegacy)
        .create(&request)
        .unwrap();

    // trunc(13.06) = 13 multiplications
    let expected = 2.94 * 50f64.powi(13);
    assert!((estimate.effort_pm() - expected).abs() / expected < 1e-12);
}

#[test]
fn test_portal_project_totals() {
    let request: EstimateRequest = read_fixture("portal_request.json");
    let catalog = portal_catalog();
    let store = MemoryStore::new();
    let estimate = EstimateService::new(&catalog, &store)
        .create(&request)
        .unwrap();

    let ids: Vec<&str> = estimate
        .process_estimates()
        .iter()
        .map(|pe| pe.process_id.as_str())
        .collect();
    assert_eq!(ids, vec!["design", "impl"]);

    // design: 16*2*1.4 + 24 = 68.8, impl: 80*1.5*1.6*0.9 + 8*1.2 = 182.4
    assert!((estimate.process_estimates()[0].base_hours - 68.8).abs() < 1e-9);
    assert!((estimate.process_estimates()[0].total_hours - 82.56).abs() < 1e-9);
    assert!((estimate.process_estimates()[1].base_hours - 182.4).abs() < 1e-9);
    assert!((estimate.process_estimates()[1].total_hours - 218.88).abs() < 1e-9);
    assert!((estimate.total_hours() - 301.44).abs() < 1e-9);

    let saved = store.find_estimate("portal-v1").unwrap();
    assert_eq!(saved, estimate);
}

#[test]
fn test_portal_text_report() {
    let request: EstimateRequest = read_fixture("portal_request.json");
    let catalog = portal_catalog();
    let store = MemoryStore::new();
    let estimate = EstimateService::new(&catalog, &store)
        .create(&request)
        .unwrap();

    let text = report::render_estimate_text(&estimate);
    assert!(text.contains("Customer portal"));
    assert!(text.contains("activity_based"));
    assert!(!text.contains("cocomo_based"));
    assert!(text.contains("Total hours: 301.44"));
}

#[test]
fn test_portal_json_report_round_trips_fields() {
    let request: EstimateRequest = read_fixture("portal_request.json");
    let catalog = portal_catalog();
    let store = MemoryStore::new();
    let estimate = EstimateService::new(&catalog, &store)
        .create(&request)
        .unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&report::render_estimate_json(&estimate)).unwrap();
    assert_eq!(value["status"], "draft");
    assert_eq!(value["process_estimates"].as_array().unwrap().len(), 2);
    assert_eq!(value["reconciliation"]["activity"]["method"], "activity_based");
    assert!(value.get("parametric").is_none());
}
