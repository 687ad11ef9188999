/// Knowledge-base loading.
///
/// The on-disk format is a JSON array of intervention records. Records may
/// omit `rationale` and `assumptions`; the loader fills those from fixed
/// tables before validation, so every record that reaches the engine carries
/// complete descriptive text.
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::KbError;
use crate::kb::InterventionKb;
use crate::model::InterventionRecord;

/// Rationale text for the seed interventions, keyed by record id.
/// A plain lookup table: ids outside it fall back to the generic sentence.
const RATIONALE_BY_ID: &[(u32, &str)] = &[
    (1, "Improves driver visibility and awareness of hazards through standardized, retroreflective signage."),
    (2, "Provides safe, designated crossing points for pedestrians; reduces vehicle-pedestrian conflicts."),
    (3, "Enhances road markings visibility; improves lane discipline and nighttime safety."),
    (4, "Reduces vehicle speed at high-risk curves; improves directional guidance."),
    (5, "Restores pavement integrity; prevents water ingress and secondary damage."),
    (6, "Prevents vehicles from leaving roadway; protects against run-off accidents."),
    (7, "Improves nighttime visibility; enhances road user awareness after dark."),
    (8, "Reduces approach speed at critical zones; warns drivers of hazards ahead."),
    (9, "Restores sightlines; improves driver decision-making time."),
    (10, "Controls traffic flow at intersections; reduces conflict points."),
    (11, "Provides dedicated, tactile infrastructure for vulnerable road users."),
    (12, "Restores road delineation; improves night visibility for all users."),
];

const GENERIC_RATIONALE: &str = "Enhances road safety in line with IRC standards.";

const DEFAULT_ASSUMPTIONS: &str = "Material-only cost; excludes labor and taxes.";

pub fn load_from_path(path: &Path) -> Result<InterventionKb, KbError> {
    let contents = fs::read_to_string(path).map_err(|source| KbError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

pub fn load_from_str(json: &str) -> Result<InterventionKb, KbError> {
    let mut records: Vec<InterventionRecord> = serde_json::from_str(json)?;
    for record in &mut records {
        fill_defaults(record);
    }
    InterventionKb::new(records)
}

fn fill_defaults(record: &mut InterventionRecord) {
    if record.rationale.trim().is_empty() {
        record.rationale = rationale_for(record.id).to_string();
        debug!(id = record.id, "filled default rationale");
    }
    if record.assumptions.trim().is_empty() {
        record.assumptions = DEFAULT_ASSUMPTIONS.to_string();
    }
}

fn rationale_for(id: u32) -> &'static str {
    RATIONALE_BY_ID
        .iter()
        .find(|(entry_id, _)| *entry_id == id)
        .map(|(_, text)| *text)
        .unwrap_or(GENERIC_RATIONALE)
}
