//! Vertical card display for a scored profile and for model metadata.

use std::fmt::Write;

use attrition_ai::ModelInfo;
use attrition_core::{EmployeeProfile, FeatureVector, PredictionResult};

/// Render a scored profile as a card: inputs, encoded vector, verdict.
pub fn prediction_card(
    profile: &EmployeeProfile,
    features: &FeatureVector,
    result: &PredictionResult,
) -> String {
    let mut out = String::new();
    out.push_str("=== Employee Attrition Prediction ===\n\n");

    out.push_str("Profile\n");
    row(&mut out, "satisfaction_level", profile.satisfaction_level);
    row(&mut out, "last_evaluation", profile.last_evaluation);
    row(&mut out, "number_project", profile.number_project);
    row(&mut out, "average_monthly_hours", profile.average_monthly_hours);
    row(&mut out, "time_spend_company", profile.time_spend_company);
    row(&mut out, "had_work_accident", yes_no(profile.had_work_accident));
    row(
        &mut out,
        "promoted_last_5_years",
        yes_no(profile.promoted_last_5_years),
    );
    row(&mut out, "department", &profile.department);
    row(&mut out, "salary_level", &profile.salary_level);
    out.push('\n');

    out.push_str("Encoded Features\n");
    for (name, value) in features.named() {
        row(&mut out, name, value);
    }
    out.push('\n');

    out.push_str("Verdict\n");
    row(&mut out, "left", result.left);
    row(
        &mut out,
        "left_probability",
        format!("{:.4}", result.left_probability),
    );
    out.push('\n');
    out.push_str(&result.summary());
    out.push('\n');
    out
}

pub fn model_card(info: &ModelInfo) -> String {
    let mut out = String::new();
    out.push_str("=== Model ===\n\n");
    if let Some(path) = &info.path {
        row(&mut out, "source", path.display());
    }
    row(&mut out, "backend", &info.backend);
    if let Some(trees) = info.trees {
        row(&mut out, "trees", trees);
    }
    out.push_str("  feature order\n");
    for (i, name) in info.feature_names.iter().enumerate() {
        let _ = writeln!(out, "    {i}  {name}");
    }
    out
}

fn row(out: &mut String, name: &str, value: impl std::fmt::Display) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "  {:<26} {}", name, value);
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
