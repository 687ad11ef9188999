use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Priority tier attached to an intervention record.
///
/// Parsing is deliberately lenient: labels are matched case-insensitively and
/// anything unrecognized resolves to `Low`, so a sloppy knowledge-base entry
/// can never fail a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Priority::parse(&label))
    }
}

/// A single road-safety intervention in the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionRecord {
    /// Stable identifier, unique across the knowledge base.
    pub id: u32,
    /// Free-text descriptions of the problems this intervention addresses.
    /// These are the only fuzzy-match targets during scoring.
    pub issue_keywords: Vec<String>,
    /// Road contexts the intervention applies to (e.g. "urban", "highway").
    #[serde(default)]
    pub road_type_tags: Vec<String>,
    pub priority: Priority,
    /// The countermeasure itself, e.g. "Install chevron signage".
    pub intervention: String,
    /// Standard or code the intervention is aligned with, e.g. "IRC 67".
    pub reference: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub assumptions: String,
    /// Informational metadata. Never consulted by scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effectiveness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<String>,
}

/// One record paired with its composite relevance score for a query.
///
/// Created during ranking and consumed immediately by the caller; never
/// persisted.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub record: &'a InterventionRecord,
    /// Composite relevance in [0.0, 1.0].
    pub score: f64,
}
