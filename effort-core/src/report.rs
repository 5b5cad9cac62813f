//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering (factors, phases and processes in input order)
//! - Byte-for-byte identical output for identical results

use crate::catalog::InMemoryCatalog;
use crate::detailed::DetailedResult;
use crate::estimate::{Estimate, EstimateComparison};
use crate::parametric::rating_label;

/// Render a detailed parametric result as text
pub fn render_detailed_text(result: &DetailedResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Model:            {}\n", result.model_type));
    output.push_str(&format!("Project size:     {:.2} KSLOC\n", result.project_size));
    output.push_str(&format!("Base effort:      {:.2} PM\n", result.base_effort));
    output.push_str(&format!(
        "Adjusted effort:  {:.2} PM ({:.2} - {:.2})\n",
        result.adjusted_effort, result.effort_range.optimistic, result.effort_range.pessimistic
    ));
    output.push_str(&format!(
        "Duration:         {:.2} months ({:.2} - {:.2})\n",
        result.duration, result.duration_range.optimistic, result.duration_range.pessimistic
    ));
    output.push_str(&format!(
        "Team size:        {:.2} ({:.2} - {:.2})\n",
        result.team_size, result.team_size_range.minimum, result.team_size_range.maximum
    ));
    if let Some(ref cost) = result.cost_estimate {
        output.push_str(&format!(
            "Cost:             {:.2} at {:.2}/h ({:.2} - {:.2})\n",
            cost.total_cost, cost.hourly_rate, cost.cost_range.minimum, cost.cost_range.maximum
        ));
    }
    output.push_str(&format!("Risk level:       {}\n", result.risk_level.as_str()));

    output.push_str("\nPhase distribution\n");
    output.push_str(&format!(
        "{:<26} {:>8} {:>10} {:>10} {:>8}\n",
        "PHASE", "EFFORT%", "EFFORT", "MONTHS", "STAFF"
    ));
    for phase in &result.phase_distribution {
        output.push_str(&format!(
            "{:<26} {:>7.0}% {:>10.2} {:>10.2} {:>8.2}\n",
            truncate_or_pad(&phase.phase, 26),
            phase.percent_effort * 100.0,
            phase.effort,
            phase.duration,
            phase.average_staff
        ));
    }

    for (title, rows) in [
        ("Scale factors", &result.scale_factor_analysis),
        ("Cost drivers", &result.cost_driver_analysis),
    ] {
        if rows.is_empty() {
            continue;
        }
        output.push_str(&format!("\n{title}\n"));
        output.push_str(&format!(
            "{:<30} {:<11} {:>8} {:>10}  {}\n",
            "NAME", "RATING", "IMPACT", "SENSITIVE", "RECOMMENDATION"
        ));
        for row in rows {
            output.push_str(&format!(
                "{:<30} {:<11} {:>8.3} {:>10.3}  {}\n",
                truncate_or_pad(&row.name, 30),
                rating_label(row.rating),
                row.impact,
                row.sensitivity,
                row.recommendation.as_deref().unwrap_or("-")
            ));
        }
    }

    if !result.risk_factors.is_empty() {
        output.push_str("\nRisks\n");
        for risk in &result.risk_factors {
            output.push_str(&format!(
                "- [{}] {}: {}\n  mitigation: {}\n",
                risk.level.as_str(),
                risk.name,
                risk.description,
                risk.mitigation
            ));
        }
    }

    output
}

/// Render a detailed parametric result as JSON
pub fn render_detailed_json(result: &DetailedResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}

/// Render a project estimate as text
pub fn render_estimate_text(estimate: &Estimate) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Estimate {} - {} ({})\n",
        estimate.id, estimate.project_name, estimate.project_id
    ));
    output.push_str(&format!(
        "{:<24} {:>6} {:>12} {:>12}\n",
        "PROCESS", "TASKS", "BASE HOURS", "HOURS"
    ));
    for pe in estimate.process_estimates() {
        output.push_str(&format!(
            "{:<24} {:>6} {:>12.2} {:>12.2}\n",
            truncate_or_pad(&pe.process_id, 24),
            pe.tasks.len(),
            pe.base_hours,
            pe.total_hours
        ));
    }

    if let Some(r) = estimate.reconciliation() {
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>12} {:>10} {:>8} {:>8} {:>6}\n",
            "METHOD", "HOURS", "PM", "MONTHS", "TEAM", "CONF"
        ));
        for result in std::iter::once(&r.activity).chain(r.parametric.as_ref()) {
            output.push_str(&format!(
                "{:<16} {:>12.2} {:>10.2} {:>8.2} {:>8.2} {:>6.2}\n",
                result.method.as_str(),
                result.total_hours,
                result.person_months,
                result.duration_months,
                result.team_size,
                result.confidence
            ));
        }
    }

    output.push_str(&format!("\nTotal hours: {:.2}\n", estimate.total_hours()));
    output
}

/// Render a project estimate as JSON
pub fn render_estimate_json(estimate: &Estimate) -> String {
    serde_json::to_string_pretty(estimate).unwrap_or_else(|_| "{}".to_string())
}

/// Render several project estimates as a JSON array
pub fn render_estimates_json(estimates: &[Estimate]) -> String {
    serde_json::to_string_pretty(estimates).unwrap_or_else(|_| "[]".to_string())
}

/// Render an estimate comparison as text
pub fn render_comparison_text(cmp: &EstimateComparison) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} vs {}\n", cmp.estimate_a, cmp.estimate_b));
    output.push_str(&format!(
        "{:<24} {:>12} {:>12} {:>12}\n",
        "PROCESS", "A", "B", "DIFF"
    ));
    for p in &cmp.processes {
        output.push_str(&format!(
            "{:<24} {:>12.2} {:>12.2} {:>+12.2}\n",
            truncate_or_pad(&p.process_id, 24),
            p.hours_a,
            p.hours_b,
            p.difference
        ));
    }
    output.push_str(&format!(
        "{:<24} {:>12.2} {:>12.2} {:>+12.2}\n",
        "TOTAL", cmp.total_hours_a, cmp.total_hours_b, cmp.difference
    ));
    match cmp.percent_change {
        Some(pct) => output.push_str(&format!("Change: {pct:+.1}%\n")),
        None => output.push_str("Change: n/a\n"),
    }
    output
}

/// Render an estimate comparison as JSON
pub fn render_comparison_json(cmp: &EstimateComparison) -> String {
    serde_json::to_string_pretty(cmp).unwrap_or_else(|_| "{}".to_string())
}

/// Render the models, scale factors and cost drivers of a catalog
pub fn render_catalog_text(catalog: &InMemoryCatalog) -> String {
    let mut output = String::new();

    output.push_str(&format!("{:<20} {:<20} {:>6} {:>6}\n", "MODEL", "NAME", "A", "B"));
    for m in catalog.models() {
        output.push_str(&format!(
            "{:<20} {:<20} {:>6.2} {:>6.2}\n",
            truncate_or_pad(&m.id, 20),
            truncate_or_pad(&m.name, 20),
            m.a,
            m.b
        ));
    }

    output.push_str(&format!("\n{:<28} {:>6}\n", "SCALE FACTOR", "WEIGHT"));
    for sf in catalog.scale_factors() {
        output.push_str(&format!(
            "{:<28} {:>6.2}\n",
            truncate_or_pad(&sf.id, 28),
            sf.weight
        ));
    }

    output.push_str(&format!("\n{:<28} {:<10} {:>6}\n", "COST DRIVER", "CATEGORY", "VALUE"));
    for cd in catalog.cost_drivers() {
        output.push_str(&format!(
            "{:<28} {:<10} {:>6.2}\n",
            truncate_or_pad(&cd.id, 28),
            cd.category().as_str(),
            cd.value
        ));
    }

    output
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        format!("{:<width$}", s, width = width)
    }
}
