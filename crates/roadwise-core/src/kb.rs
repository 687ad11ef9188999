use std::collections::{BTreeSet, HashSet};

use crate::error::KbError;
use crate::model::{InterventionRecord, Priority};

/// Immutable, validated collection of intervention records.
///
/// Construction fails fast on structural problems (zero records, duplicate
/// ids, a record with no issue keywords) so the query path never has to
/// re-check invariants. Loaded once and shared for the process lifetime;
/// a reload is a whole-collection swap, never an in-place edit.
pub struct InterventionKb {
    records: Vec<InterventionRecord>,
}

/// Record counts per priority tier, for knowledge-base statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl InterventionKb {
    pub fn new(records: Vec<InterventionRecord>) -> Result<Self, KbError> {
        if records.is_empty() {
            return Err(KbError::Empty);
        }

        let mut seen_ids = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen_ids.insert(record.id) {
                return Err(KbError::DuplicateId(record.id));
            }
            if record.issue_keywords.is_empty() {
                return Err(KbError::NoIssueKeywords(record.id));
            }
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[InterventionRecord] {
        &self.records
    }

    pub fn get(&self, id: u32) -> Option<&InterventionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct road-type tags across the knowledge base, sorted.
    pub fn road_types(&self) -> Vec<String> {
        let tags: BTreeSet<&str> = self
            .records
            .iter()
            .flat_map(|record| record.road_type_tags.iter())
            .map(|tag| tag.as_str())
            .filter(|tag| !tag.is_empty())
            .collect();
        tags.into_iter().map(str::to_string).collect()
    }

    /// Distinct reference standards across the knowledge base, sorted.
    pub fn references(&self) -> Vec<String> {
        let refs: BTreeSet<&str> = self
            .records
            .iter()
            .map(|record| record.reference.as_str())
            .filter(|reference| !reference.is_empty())
            .collect();
        refs.into_iter().map(str::to_string).collect()
    }

    pub fn priority_counts(&self) -> PriorityCounts {
        let mut counts = PriorityCounts::default();
        for record in &self.records {
            match record.priority {
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
        }
        counts
    }
}
