/// Presentation helpers over ranked results: confidence labels, formatted
/// recommendation cards, and the plain-text report. None of this feeds back
/// into scoring.
use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::{InterventionRecord, Priority};

/// Four-level confidence label for a composite score.
///
/// Lower bounds are inclusive: 0.8 "Very High", 0.6 "High", 0.4 "Medium",
/// anything below "Low". Independent of the admission threshold, so an
/// admitted result can still be labeled "Low".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Confidence::VeryHigh
        } else if score >= 0.6 {
            Confidence::High
        } else if score >= 0.4 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::VeryHigh => "Very High",
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A ranked intervention formatted for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub id: u32,
    pub intervention: String,
    pub reference: String,
    pub rationale: String,
    pub assumptions: String,
    pub priority: Priority,
    /// Relevance as a percentage, rounded to one decimal place.
    pub relevance_score: f64,
    pub confidence: Confidence,
}

pub fn format_recommendation(record: &InterventionRecord, score: f64) -> Recommendation {
    Recommendation {
        id: record.id,
        intervention: record.intervention.clone(),
        reference: record.reference.clone(),
        rationale: record.rationale.clone(),
        assumptions: record.assumptions.clone(),
        priority: record.priority,
        relevance_score: (score * 1000.0).round() / 10.0,
        confidence: Confidence::from_score(score),
    }
}

/// Render recommendations as a plain-text report.
pub fn render_report(
    recommendations: &[Recommendation],
    query: &str,
    road_type: Option<&str>,
    environment: Option<&str>,
) -> String {
    let rule = "=".repeat(70);
    let divider = "-".repeat(70);

    let mut lines: Vec<String> = Vec::new();
    lines.push(rule.clone());
    lines.push("ROADWISE - ROAD SAFETY INTERVENTION RECOMMENDATION REPORT".to_string());
    lines.push(rule.clone());
    lines.push(String::new());

    lines.push("QUERY DETAILS:".to_string());
    lines.push(format!("  Issue: {query}"));
    if let Some(road_type) = road_type {
        lines.push(format!("  Road Type: {road_type}"));
    }
    if let Some(environment) = environment {
        lines.push(format!("  Environment: {environment}"));
    }
    lines.push(String::new());

    lines.push("RECOMMENDED INTERVENTIONS:".to_string());
    lines.push(divider.clone());
    for (index, rec) in recommendations.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("[Recommendation {}]", index + 1));
        lines.push(format!("Intervention: {}", rec.intervention));
        lines.push(format!("Reference: {}", rec.reference));
        lines.push(format!("Rationale: {}", rec.rationale));
        lines.push(format!("Assumptions: {}", rec.assumptions));
        lines.push(format!("Confidence: {} ({}%)", rec.confidence, rec.relevance_score));
        lines.push(divider.clone());
    }

    lines.push(String::new());
    lines.push("NOTE: All recommendations are material-only estimates.".to_string());
    lines.push("Labor, transport, and taxes are excluded from cost calculations.".to_string());
    lines.push(rule);

    lines.join("\n")
}
