/// MCP server implementation for road-safety intervention recommendations.
///
/// Exposes five tools:
/// - `suggest_interventions`: Ranked recommendations for a hazard description
/// - `get_intervention`: Look up a specific intervention by id
/// - `kb_stats`: Knowledge-base statistics
/// - `generate_report`: Plain-text recommendation report
/// - `reload_knowledge_base`: Re-read the KB file and swap it in atomically
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tokio::sync::RwLock;
use tracing::info;

use roadwise_core::engine::RetrievalEngine;
use roadwise_core::explain;
use roadwise_core::model::{InterventionRecord, ScoredCandidate};

use crate::api::{
    FallbackGuidance, GenerateReportParams, GetInterventionParams, InterventionDetailResponse,
    KbStatsResponse, PriorityBreakdown, QueryEcho, RecommendationCard, ReloadResponse,
    ReportResponse, ResponseMetadata, SuggestInterventionsParams, SuggestResponse,
};
use crate::cache::SuggestionCache;
use crate::reload::ReloadService;

const MAX_TOP_K: usize = 10;
const SYSTEM_NAME: &str = "RoadWise v1.0";
const COST_NOTE: &str = "Material-only costs; excludes labor and taxes";

/// Shared application state. Queries take the read side; only a knowledge-base
/// reload takes the write side, swapping the whole engine at once.
pub struct AppState {
    pub engine: RetrievalEngine,
    pub kb_fingerprint: String,
}

#[derive(Clone)]
pub struct RoadwiseServer {
    state: Arc<RwLock<AppState>>,
    cache: Arc<SuggestionCache>,
    reload_service: Arc<ReloadService>,
    tool_router: ToolRouter<RoadwiseServer>,
}

impl RoadwiseServer {
    pub fn new(
        engine: RetrievalEngine,
        kb_fingerprint: String,
        cache: Arc<SuggestionCache>,
        reload_service: Arc<ReloadService>,
    ) -> Self {
        let state = Arc::new(RwLock::new(AppState {
            engine,
            kb_fingerprint,
        }));

        Self {
            state,
            cache,
            reload_service,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl RoadwiseServer {
    #[tool(description = "Recommend road-safety interventions for a described hazard. Returns ranked, cited recommendations with confidence labels, or refinement guidance when nothing in the knowledge base matches well enough.")]
    async fn suggest_interventions(
        &self,
        Parameters(params): Parameters<SuggestInterventionsParams>,
    ) -> Result<Json<SuggestResponse>, String> {
        let query = params.query.trim().to_string();
        if query.is_empty() {
            return Err("query must not be empty".to_string());
        }
        let road_type = normalize_context(params.road_type);
        let environment = normalize_context(params.environment);

        let top_k = {
            let state = self.state.read().await;
            params
                .top_k
                .map(|k| k as usize)
                .unwrap_or(state.engine.config().default_top_k)
                .min(MAX_TOP_K)
        };

        if let Some(cached) = self
            .cache
            .get_suggestions(&query, road_type.as_deref(), environment.as_deref(), top_k)
            .await
        {
            info!(query = %query, "suggestion cache hit");
            return Ok(Json(cached));
        }

        let response = {
            let state = self.state.read().await;
            let ranked = state.engine.retrieve_and_rank(
                &query,
                road_type.as_deref(),
                environment.as_deref(),
                top_k,
            );

            if state.engine.meets_threshold(&ranked) {
                success_response(&query, road_type.as_deref(), environment.as_deref(), &ranked)
            } else {
                no_match_response(&query, road_type.as_deref(), environment.as_deref())
            }
        };

        self.cache
            .set_suggestions(
                &query,
                road_type.as_deref(),
                environment.as_deref(),
                top_k,
                &response,
            )
            .await;

        Ok(Json(response))
    }

    #[tool(description = "Get the full detail of a specific intervention by its numeric id, including references, rationale, assumptions, and any cost metadata.")]
    async fn get_intervention(
        &self,
        Parameters(params): Parameters<GetInterventionParams>,
    ) -> Result<Json<InterventionDetailResponse>, String> {
        let state = self.state.read().await;
        let record = state
            .engine
            .kb()
            .get(params.intervention_id)
            .ok_or_else(|| format!("intervention not found: {}", params.intervention_id))?;

        Ok(Json(to_detail(record)))
    }

    #[tool(description = "Knowledge-base statistics: total interventions, road types covered, priority breakdown, and the reference standards cited.")]
    async fn kb_stats(&self) -> Result<Json<KbStatsResponse>, String> {
        let state = self.state.read().await;
        let kb = state.engine.kb();
        let counts = kb.priority_counts();

        Ok(Json(KbStatsResponse {
            total_interventions: kb.len(),
            road_types: kb.road_types(),
            priority_breakdown: PriorityBreakdown {
                high: counts.high,
                medium: counts.medium,
                low: counts.low,
            },
            references: kb.references(),
        }))
    }

    #[tool(description = "Generate a plain-text recommendation report for a described hazard, suitable for inclusion in a safety-audit document.")]
    async fn generate_report(
        &self,
        Parameters(params): Parameters<GenerateReportParams>,
    ) -> Result<Json<ReportResponse>, String> {
        let query = params.query.trim().to_string();
        if query.is_empty() {
            return Err("query must not be empty".to_string());
        }
        let road_type = normalize_context(params.road_type);
        let environment = normalize_context(params.environment);

        let state = self.state.read().await;
        let top_k = params
            .top_k
            .map(|k| k as usize)
            .unwrap_or(state.engine.config().default_top_k)
            .min(MAX_TOP_K);

        let ranked = state.engine.retrieve_and_rank(
            &query,
            road_type.as_deref(),
            environment.as_deref(),
            top_k,
        );

        let report = if state.engine.meets_threshold(&ranked) {
            let recommendations: Vec<_> = ranked
                .iter()
                .map(|candidate| explain::format_recommendation(candidate.record, candidate.score))
                .collect();
            explain::render_report(
                &recommendations,
                &query,
                road_type.as_deref(),
                environment.as_deref(),
            )
        } else {
            fallback_report(&query)
        };

        Ok(Json(ReportResponse { report }))
    }

    #[tool(description = "Re-read the knowledge-base file and, if its contents changed, atomically swap in the new collection and invalidate cached suggestions.")]
    async fn reload_knowledge_base(&self) -> Result<Json<ReloadResponse>, String> {
        info!("reload_knowledge_base tool invoked");

        let current_fingerprint = self
            .reload_service
            .file_fingerprint()
            .map_err(|e| format!("reload failed: {e}"))?;

        {
            let state = self.state.read().await;
            if state.kb_fingerprint == current_fingerprint {
                info!("knowledge base unchanged, skipping reload");
                return Ok(Json(ReloadResponse {
                    reloaded: false,
                    fingerprint: current_fingerprint,
                    record_count: state.engine.kb().len(),
                }));
            }
        }

        let (engine, fingerprint) = self
            .reload_service
            .rebuild()
            .map_err(|e| format!("reload failed: {e}"))?;
        let record_count = engine.kb().len();

        {
            let mut state = self.state.write().await;
            state.engine = engine;
            state.kb_fingerprint = fingerprint.clone();
        }
        self.cache.invalidate_all().await;
        info!(record_count, "knowledge base swapped");

        Ok(Json(ReloadResponse {
            reloaded: true,
            fingerprint,
            record_count,
        }))
    }
}

/// Trim a caller-supplied context argument; an empty string means "not given".
fn normalize_context(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn query_echo(query: &str, road_type: Option<&str>, environment: Option<&str>) -> QueryEcho {
    QueryEcho {
        issue: query.to_string(),
        road_type: road_type.unwrap_or("urban (default)").to_string(),
        environment: environment.unwrap_or("general").to_string(),
    }
}

fn metadata() -> ResponseMetadata {
    ResponseMetadata {
        system: SYSTEM_NAME.to_string(),
        note: COST_NOTE.to_string(),
    }
}

fn success_response(
    query: &str,
    road_type: Option<&str>,
    environment: Option<&str>,
    ranked: &[ScoredCandidate<'_>],
) -> SuggestResponse {
    let recommendations: Vec<RecommendationCard> = ranked
        .iter()
        .map(|candidate| {
            let rec = explain::format_recommendation(candidate.record, candidate.score);
            RecommendationCard {
                id: rec.id,
                intervention: rec.intervention,
                reference: rec.reference,
                rationale: rec.rationale,
                assumptions: rec.assumptions,
                priority: rec.priority.to_string(),
                relevance_score: rec.relevance_score,
                confidence: rec.confidence.to_string(),
            }
        })
        .collect();

    SuggestResponse {
        status: "success".to_string(),
        query: query_echo(query, road_type, environment),
        total_recommendations: recommendations.len(),
        recommendations,
        fallback: None,
        metadata: metadata(),
    }
}

fn no_match_response(
    query: &str,
    road_type: Option<&str>,
    environment: Option<&str>,
) -> SuggestResponse {
    SuggestResponse {
        status: "no_match".to_string(),
        query: query_echo(query, road_type, environment),
        recommendations: Vec::new(),
        total_recommendations: 0,
        fallback: Some(fallback_guidance()),
        metadata: metadata(),
    }
}

fn fallback_guidance() -> FallbackGuidance {
    FallbackGuidance {
        message: "No direct IRC-aligned intervention found in knowledge base.".to_string(),
        suggestions: vec![
            "Refine your query with specific road type (urban/highway/rural)".to_string(),
            "Add environment context (e.g., curve, school zone, intersection)".to_string(),
            "Check for alternative terms related to the issue".to_string(),
            "Contact administrators to expand knowledge base".to_string(),
        ],
        fallback_action: "Please consult road safety engineers or refer to IRC SP:84 and IRC SP:87 for general guidance.".to_string(),
    }
}

fn fallback_report(query: &str) -> String {
    let guidance = fallback_guidance();
    let mut lines = vec![
        guidance.message,
        String::new(),
        format!("Query: {query}"),
        String::new(),
        "Suggestions:".to_string(),
    ];
    for suggestion in &guidance.suggestions {
        lines.push(format!("  - {suggestion}"));
    }
    lines.push(String::new());
    lines.push(guidance.fallback_action);
    lines.join("\n")
}

fn to_detail(record: &InterventionRecord) -> InterventionDetailResponse {
    InterventionDetailResponse {
        id: record.id,
        issue_keywords: record.issue_keywords.clone(),
        road_type_tags: record.road_type_tags.clone(),
        priority: record.priority.to_string(),
        intervention: record.intervention.clone(),
        reference: record.reference.clone(),
        rationale: record.rationale.clone(),
        assumptions: record.assumptions.clone(),
        cost_estimate: record.cost_estimate.clone(),
        implementation_time: record.implementation_time.clone(),
        effectiveness: record.effectiveness.clone(),
        maintenance: record.maintenance.clone(),
    }
}

#[tool_handler]
impl ServerHandler for RoadwiseServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "roadwise".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Road-safety intervention recommendation MCP server. Describe an observed \
                 hazard with suggest_interventions (optionally qualified by road_type and \
                 environment) to get ranked, IRC-referenced countermeasures with confidence \
                 labels. Use get_intervention for full detail by id, kb_stats for coverage \
                 statistics, generate_report for an audit-ready text report, and \
                 reload_knowledge_base after editing the knowledge-base file."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RoadwiseServer, fallback_report, normalize_context};

    #[test]
    fn tools_publish_output_schemas() {
        let tools = RoadwiseServer::tool_router().list_all();
        for name in [
            "suggest_interventions",
            "get_intervention",
            "kb_stats",
            "generate_report",
            "reload_knowledge_base",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[test]
    fn context_normalization_drops_blank_values() {
        assert_eq!(normalize_context(None), None);
        assert_eq!(normalize_context(Some("  ".to_string())), None);
        assert_eq!(
            normalize_context(Some(" urban ".to_string())),
            Some("urban".to_string())
        );
    }

    #[test]
    fn fallback_report_names_the_query() {
        let report = fallback_report("levitating road surface");
        assert!(report.contains("Query: levitating road surface"));
        assert!(report.contains("No direct IRC-aligned intervention found"));
    }
}
