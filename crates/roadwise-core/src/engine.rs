use crate::fuzzy;
use crate::kb::InterventionKb;
use crate::model::{InterventionRecord, ScoredCandidate};
use crate::scoring::{self, ScoringConfig};
use crate::tokenize;

/// Retrieval and ranking over an immutable knowledge base.
///
/// The engine is stateless per call: scoring is a pure function of the query,
/// the record, and the configuration fixed at construction, so concurrent
/// queries against one instance need no locking.
pub struct RetrievalEngine {
    kb: InterventionKb,
    config: ScoringConfig,
}

impl RetrievalEngine {
    pub fn new(kb: InterventionKb, config: ScoringConfig) -> Self {
        Self { kb, config }
    }

    pub fn with_defaults(kb: InterventionKb) -> Self {
        Self::new(kb, ScoringConfig::default())
    }

    pub fn kb(&self) -> &InterventionKb {
        &self.kb
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Composite relevance of one record for a query, in [0.0, 1.0].
    ///
    /// Mean best fuzzy match of each query token against the record's issue
    /// keywords, plus road-type, environment, and priority contributions,
    /// hard-capped at 1.0 so stacked boosts cannot push a score past the top
    /// of the confidence scale.
    pub fn score(
        &self,
        query: &str,
        record: &InterventionRecord,
        road_type: Option<&str>,
        environment: Option<&str>,
    ) -> f64 {
        let tokens = tokenize::tokenize(query);
        self.score_tokens(&tokens, query, record, road_type, environment)
    }

    fn score_tokens(
        &self,
        tokens: &[String],
        query: &str,
        record: &InterventionRecord,
        road_type: Option<&str>,
        environment: Option<&str>,
    ) -> f64 {
        // Empty token list (stop-word-only query) contributes nothing rather
        // than dividing by zero.
        let base_similarity = if tokens.is_empty() {
            0.0
        } else {
            let total: f64 = tokens
                .iter()
                .map(|token| {
                    record
                        .issue_keywords
                        .iter()
                        .map(|keyword| fuzzy::token_set_ratio(token, keyword))
                        .fold(0.0, f64::max)
                })
                .sum();
            total / tokens.len() as f64
        };

        let composite = base_similarity
            + scoring::road_type_boost(&self.config, record, road_type)
            + scoring::environment_boost(&self.config, query, environment)
            + self.config.priority_weights.weight(record.priority);

        composite.min(1.0)
    }

    /// Score every record, sort descending by score with a descending
    /// priority-weight tie-break, and truncate to `top_k`.
    pub fn retrieve_and_rank(
        &self,
        query: &str,
        road_type: Option<&str>,
        environment: Option<&str>,
        top_k: usize,
    ) -> Vec<ScoredCandidate<'_>> {
        // Tokenize once per query, not once per record.
        let tokens = tokenize::tokenize(query);

        let mut scored: Vec<ScoredCandidate<'_>> = self
            .kb
            .records()
            .iter()
            .map(|record| ScoredCandidate {
                record,
                score: self.score_tokens(&tokens, query, record, road_type, environment),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score.total_cmp(&a.score).then_with(|| {
                let weight_a = self.config.priority_weights.weight(a.record.priority);
                let weight_b = self.config.priority_weights.weight(b.record.priority);
                weight_b.total_cmp(&weight_a)
            })
        });

        scored.truncate(top_k);
        scored
    }

    /// The sole admission gate: true iff the ranked list is non-empty and its
    /// top score reaches the configured threshold. Callers must check this
    /// before presenting results as recommendations.
    pub fn meets_threshold(&self, ranked: &[ScoredCandidate<'_>]) -> bool {
        ranked
            .first()
            .is_some_and(|top| top.score >= self.config.score_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::scoring::PriorityWeights;

    fn record(
        id: u32,
        keywords: &[&str],
        tags: &[&str],
        priority: Priority,
    ) -> InterventionRecord {
        InterventionRecord {
            id,
            issue_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            road_type_tags: tags.iter().map(|t| t.to_string()).collect(),
            priority,
            intervention: format!("Intervention {id}"),
            reference: "IRC 67".to_string(),
            rationale: "r".to_string(),
            assumptions: "a".to_string(),
            cost_estimate: None,
            implementation_time: None,
            effectiveness: None,
            maintenance: None,
        }
    }

    fn fixture_engine() -> RetrievalEngine {
        let kb = InterventionKb::new(vec![
            record(1, &["blind curve", "chevron sign"], &["rural"], Priority::High),
            record(2, &["faded zebra crossing"], &["urban"], Priority::High),
            record(3, &["potholes", "broken pavement"], &["urban", "rural"], Priority::Medium),
            record(4, &["street light outage"], &["urban"], Priority::Low),
        ])
        .unwrap();
        RetrievalEngine::with_defaults(kb)
    }

    #[test]
    fn blind_curve_scenario_passes_the_gate() {
        let engine = fixture_engine();
        let ranked =
            engine.retrieve_and_rank("accidents at blind curve, missing chevron signs", None, None, 3);

        assert_eq!(ranked[0].record.id, 1);
        assert!(ranked[0].score >= 0.3, "top score was {}", ranked[0].score);
        assert!(engine.meets_threshold(&ranked));
    }

    #[test]
    fn stop_word_query_scores_boosts_only() {
        let engine = fixture_engine();
        let zebra = engine.kb().get(2).unwrap();
        // Tokens are empty, so the score is exactly the implicit urban boost
        // plus the priority weight.
        let score = engine.score("the a is", zebra, None, None);
        assert!((score - (0.05 + 0.03)).abs() < 1e-9, "got {score}");

        let ranked = engine.retrieve_and_rank("the a is", None, None, 3);
        assert!(!engine.meets_threshold(&ranked));
    }

    #[test]
    fn stacked_boosts_cap_at_one() {
        let kb = InterventionKb::new(vec![record(
            1,
            &["school crossing"],
            &["urban"],
            Priority::High,
        )])
        .unwrap();
        let engine = RetrievalEngine::with_defaults(kb);
        let top = engine.kb().get(1).unwrap();

        let score = engine.score("school crossing", top, Some("urban"), Some("school zone"));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn scores_stay_in_bounds() {
        let engine = fixture_engine();
        for query in ["potholes everywhere", "dark blind curve at night", "zzz"] {
            for candidate in engine.retrieve_and_rank(query, Some("urban"), Some("wet"), 10) {
                assert!(
                    (0.0..=1.0).contains(&candidate.score),
                    "{query} gave {}",
                    candidate.score
                );
            }
        }
    }

    #[test]
    fn ranking_is_sorted_descending() {
        let engine = fixture_engine();
        let ranked = engine.retrieve_and_rank("faded zebra crossing near school", None, None, 4);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(ranked[0].record.id, 2);
    }

    #[test]
    fn equal_scores_break_ties_by_priority() {
        // Same keywords, so base similarity is identical. The tuned config
        // makes the Low record's urban boost exactly offset the High record's
        // priority weight, producing a genuine score tie.
        let config = ScoringConfig {
            priority_weights: PriorityWeights { high: 0.25, medium: 0.1, low: 0.0 },
            implicit_urban_boost: 0.25,
            ..ScoringConfig::default()
        };
        let kb = InterventionKb::new(vec![
            record(1, &["pothole repair"], &["urban"], Priority::Low),
            record(2, &["pothole repair"], &[], Priority::High),
        ])
        .unwrap();
        let engine = RetrievalEngine::new(kb, config);

        let ranked = engine.retrieve_and_rank("potholes", None, None, 2);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[0].record.id, 2, "High priority should sort first");
    }

    #[test]
    fn top_k_bounds_the_result() {
        let engine = fixture_engine();
        assert!(engine.retrieve_and_rank("potholes", None, None, 0).is_empty());
        assert_eq!(engine.retrieve_and_rank("potholes", None, None, 2).len(), 2);
        assert_eq!(engine.retrieve_and_rank("potholes", None, None, 100).len(), 4);
    }

    #[test]
    fn threshold_gate_boundary_is_inclusive() {
        let engine = fixture_engine();
        let rec = engine.kb().get(1).unwrap();

        assert!(!engine.meets_threshold(&[]));
        assert!(!engine.meets_threshold(&[ScoredCandidate { record: rec, score: 0.29 }]));
        assert!(engine.meets_threshold(&[ScoredCandidate { record: rec, score: 0.30 }]));
    }

    #[test]
    fn explicit_environment_never_lowers_a_score() {
        let engine = fixture_engine();
        for record in engine.kb().records() {
            let plain = engine.score("faded zebra crossing", record, None, None);
            let with_env = engine.score("faded zebra crossing", record, None, Some("school zone"));
            assert!(with_env >= plain);
        }
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let engine = fixture_engine();
        let first = engine.retrieve_and_rank("broken pavement at night", Some("rural"), None, 4);
        let second = engine.retrieve_and_rank("broken pavement at night", Some("rural"), None, 4);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.record.id, b.record.id);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn custom_priority_weights_are_honored() {
        let config = ScoringConfig {
            priority_weights: PriorityWeights { high: 0.2, medium: 0.1, low: 0.0 },
            ..ScoringConfig::default()
        };
        let kb = InterventionKb::new(vec![record(1, &["potholes"], &[], Priority::High)]).unwrap();
        let engine = RetrievalEngine::new(kb, config);
        let rec = engine.kb().get(1).unwrap();
        let score = engine.score("the a is", rec, None, None);
        assert!((score - 0.2).abs() < 1e-9);
    }
}
