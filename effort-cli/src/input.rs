//! JSON input files accepted by the CLI

use anyhow::{Context, Result};
use effort_core::activity::{Process, Task};
use effort_core::factor::Factor;
use effort_core::parametric::{CostDriverRating, ScaleFactorRating};
use effort_core::service::{EstimateRequest, ParametricRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

/// Parametric sizing and ratings
///
/// `id` defaults to the file stem and `model` to the configured model.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParametricInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub project_size: f64,
    #[serde(default)]
    pub scale_factors: Vec<ScaleFactorRating>,
    #[serde(default)]
    pub cost_drivers: Vec<CostDriverRating>,
}

impl ParametricInput {
    /// Precedence: explicit override, then the file, then the default model
    pub fn into_request(
        self,
        fallback_id: &str,
        model_override: Option<&str>,
        default_model: &str,
    ) -> ParametricRequest {
        let model_id = model_override
            .map(str::to_string)
            .or(self.model)
            .unwrap_or_else(|| default_model.to_string());
        ParametricRequest {
            id: self.id.unwrap_or_else(|| fallback_id.to_string()),
            model_id,
            project_size: self.project_size,
            scale_factors: self.scale_factors,
            cost_drivers: self.cost_drivers,
        }
    }
}

/// A project: its process catalog, factors, tasks and optional parametric block
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectInput {
    #[serde(default)]
    pub id: Option<String>,
    pub project_id: String,
    pub project_name: String,
    #[serde(default)]
    pub processes: Vec<Process>,
    /// Factor definitions available to `global_factors`
    #[serde(default)]
    pub factors: Vec<Factor>,
    #[serde(default)]
    pub global_factors: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub parametric: Option<ParametricInput>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub notes: String,
}

impl ProjectInput {
    pub fn request(&self, fallback_id: &str, default_model: &str) -> EstimateRequest {
        let id = self.id.clone().unwrap_or_else(|| fallback_id.to_string());
        EstimateRequest {
            id: id.clone(),
            project_id: self.project_id.clone(),
            project_name: self.project_name.clone(),
            tasks: self.tasks.clone(),
            global_factors: self.global_factors.clone(),
            parametric: self
                .parametric
                .clone()
                .map(|p| p.into_request(&format!("{id}-parametric"), None, default_model)),
            created_by: self.created_by.clone(),
            notes: self.notes.clone(),
        }
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse input file: {}", path.display()))
}

/// File stem used as the default id
pub fn file_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "estimate".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_precedence() {
        let input: ParametricInput =
            serde_json::from_str(r#"{"model": "post_architecture", "project_size": 5}"#).unwrap();
        let r = input.clone().into_request("x", None, "early_design");
        assert_eq!(r.model_id, "post_architecture");
        assert_eq!(r.id, "x");
        let r = input.into_request("x", Some("early_design"), "early_design");
        assert_eq!(r.model_id, "early_design");
    }

    #[test]
    fn test_project_input_parses() {
        let json = r#"{
            "project_id": "p1",
            "project_name": "Portal",
            "processes": [{
                "id": "impl",
                "category": "implementation",
                "name": "Implementation",
                "activities": [{"id": "code", "name": "Coding", "base_hours": 10}]
            }],
            "tasks": [{"process_id": "impl", "activity_id": "code", "complexity": 2, "scale": 1}],
            "parametric": {"project_size": 3}
        }"#;
        let input: ProjectInput = serde_json::from_str(json).unwrap();
        let req = input.request("file", "early_design");
        assert_eq!(req.id, "file");
        assert_eq!(req.tasks.len(), 1);
        let p = req.parametric.unwrap();
        assert_eq!(p.id, "file-parametric");
        assert_eq!(p.model_id, "early_design");
    }

    #[test]
    fn test_file_id_uses_stem() {
        assert_eq!(file_id(Path::new("/tmp/billing.json")), "billing");
    }
}
