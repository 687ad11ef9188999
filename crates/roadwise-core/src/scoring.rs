use crate::model::{InterventionRecord, Priority};

/// Additive score bonus per priority tier. Doubles as the ranking tie-break.
#[derive(Debug, Clone, Copy)]
pub struct PriorityWeights {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl PriorityWeights {
    pub fn weight(&self, priority: Priority) -> f64 {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            high: 0.03,
            medium: 0.015,
            low: 0.005,
        }
    }
}

/// Immutable scoring tunables, fixed at engine construction.
///
/// There is no ambient global configuration: engines with different tables
/// can coexist in one process and be tested independently.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub priority_weights: PriorityWeights,
    /// Environment trigger terms and their additive weights, matched by
    /// substring against the lower-cased query.
    pub env_boosts: Vec<(String, f64)>,
    /// Cap on the cumulative environment boost.
    pub env_boost_cap: f64,
    /// Minimum environment boost when the caller names an environment
    /// explicitly, regardless of what the query text contains.
    pub explicit_env_floor: f64,
    /// Boost when the supplied road type matches one of the record's tags.
    pub road_type_match_boost: f64,
    /// Boost for "urban"-tagged records when no road type is supplied.
    pub implicit_urban_boost: f64,
    /// Minimum top score for results to count as a recommendation.
    pub score_threshold: f64,
    pub default_top_k: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let env_boosts = [
            ("school", 0.08),
            ("curve", 0.08),
            ("intersection", 0.07),
            ("blind", 0.07),
            ("night", 0.06),
            ("pedestrian", 0.08),
            ("guardrail", 0.05),
            ("dark", 0.06),
        ];

        Self {
            priority_weights: PriorityWeights::default(),
            env_boosts: env_boosts
                .into_iter()
                .map(|(term, weight)| (term.to_string(), weight))
                .collect(),
            env_boost_cap: 0.25,
            explicit_env_floor: 0.08,
            road_type_match_boost: 0.15,
            implicit_urban_boost: 0.05,
            score_threshold: 0.3,
            default_top_k: 3,
        }
    }
}

/// Cumulative environment boost for a query.
///
/// Sums the weights of every trigger term present in the lower-cased query,
/// capped at `env_boost_cap`. An explicit `environment` argument floors the
/// result at `explicit_env_floor` even when the text itself triggers nothing.
pub fn environment_boost(
    config: &ScoringConfig,
    query: &str,
    environment: Option<&str>,
) -> f64 {
    let lowered = query.to_lowercase();
    let mut boost = 0.0;
    for (term, weight) in &config.env_boosts {
        if lowered.contains(term.as_str()) {
            boost += weight;
        }
    }
    boost = boost.min(config.env_boost_cap);
    if environment.is_some() {
        boost = boost.max(config.explicit_env_floor);
    }
    boost
}

/// Road-type alignment boost for one record.
pub fn road_type_boost(
    config: &ScoringConfig,
    record: &InterventionRecord,
    road_type: Option<&str>,
) -> f64 {
    match road_type {
        Some(road_type) => {
            let road_type = road_type.trim();
            if record
                .road_type_tags
                .iter()
                .any(|tag| tag.trim().eq_ignore_ascii_case(road_type))
            {
                config.road_type_match_boost
            } else {
                0.0
            }
        }
        // No context given: assume the common urban setting.
        None => {
            if record
                .road_type_tags
                .iter()
                .any(|tag| tag.trim().eq_ignore_ascii_case("urban"))
            {
                config.implicit_urban_boost
            } else {
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_tags(tags: &[&str]) -> InterventionRecord {
        InterventionRecord {
            id: 1,
            issue_keywords: vec!["faded markings".to_string()],
            road_type_tags: tags.iter().map(|t| t.to_string()).collect(),
            priority: Priority::Medium,
            intervention: "Repaint lane markings".to_string(),
            reference: "IRC 35".to_string(),
            rationale: String::new(),
            assumptions: String::new(),
            cost_estimate: None,
            implementation_time: None,
            effectiveness: None,
            maintenance: None,
        }
    }

    #[test]
    fn environment_boost_sums_matched_terms() {
        let config = ScoringConfig::default();
        let boost = environment_boost(&config, "dark stretch near school", None);
        // school 0.08 + dark 0.06
        assert!((boost - 0.14).abs() < 1e-9);
    }

    #[test]
    fn environment_boost_is_capped() {
        let config = ScoringConfig::default();
        let query = "school curve intersection blind night pedestrian guardrail dark";
        assert_eq!(environment_boost(&config, query, None), 0.25);
    }

    #[test]
    fn explicit_environment_floors_the_boost() {
        let config = ScoringConfig::default();
        assert_eq!(environment_boost(&config, "potholes", None), 0.0);
        assert_eq!(
            environment_boost(&config, "potholes", Some("school zone")),
            0.08
        );
        // An already-larger text boost is untouched by the floor.
        let boosted = environment_boost(&config, "dark stretch near school", Some("school zone"));
        assert!((boosted - 0.14).abs() < 1e-9);
    }

    #[test]
    fn road_type_match_is_case_insensitive() {
        let config = ScoringConfig::default();
        let record = record_with_tags(&["Highway"]);
        assert_eq!(road_type_boost(&config, &record, Some("highway")), 0.15);
        assert_eq!(road_type_boost(&config, &record, Some("rural")), 0.0);
    }

    #[test]
    fn missing_road_type_defaults_to_urban_assumption() {
        let config = ScoringConfig::default();
        assert_eq!(
            road_type_boost(&config, &record_with_tags(&["urban", "rural"]), None),
            0.05
        );
        assert_eq!(road_type_boost(&config, &record_with_tags(&["rural"]), None), 0.0);
        assert_eq!(road_type_boost(&config, &record_with_tags(&[]), None), 0.0);
    }
}
