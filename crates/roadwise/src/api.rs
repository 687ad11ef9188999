use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SuggestInterventionsParams {
    /// Free-text description of the observed road hazard.
    pub query: String,
    /// Road context such as "urban", "highway", or "rural".
    pub road_type: Option<String>,
    /// Environmental context, e.g. "school zone", "sharp curve".
    pub environment: Option<String>,
    /// Number of recommendations to return (default: 3, max: 10).
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecommendationCard {
    pub id: u32,
    pub intervention: String,
    pub reference: String,
    pub rationale: String,
    pub assumptions: String,
    pub priority: String,
    /// Relevance as a percentage, one decimal place.
    pub relevance_score: f64,
    pub confidence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryEcho {
    pub issue: String,
    pub road_type: String,
    pub environment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FallbackGuidance {
    pub message: String,
    pub suggestions: Vec<String>,
    pub fallback_action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResponseMetadata {
    pub system: String,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SuggestResponse {
    /// "success" when the top result clears the admission threshold,
    /// "no_match" otherwise.
    pub status: String,
    pub query: QueryEcho,
    pub recommendations: Vec<RecommendationCard>,
    pub total_recommendations: usize,
    /// Present only on "no_match": guidance for refining the query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackGuidance>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetInterventionParams {
    /// Stable intervention id.
    pub intervention_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InterventionDetailResponse {
    pub id: u32,
    pub issue_keywords: Vec<String>,
    pub road_type_tags: Vec<String>,
    pub priority: String,
    pub intervention: String,
    pub reference: String,
    pub rationale: String,
    pub assumptions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effectiveness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KbStatsResponse {
    pub total_interventions: usize,
    pub road_types: Vec<String>,
    pub priority_breakdown: PriorityBreakdown,
    /// Distinct reference standards cited across the knowledge base.
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateReportParams {
    /// Free-text description of the observed road hazard.
    pub query: String,
    pub road_type: Option<String>,
    pub environment: Option<String>,
    /// Number of recommendations to include (default: 3, max: 10).
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportResponse {
    pub report: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReloadResponse {
    pub reloaded: bool,
    /// Hex SHA-256 of the knowledge-base file contents.
    pub fingerprint: String,
    pub record_count: usize,
}
