//! Accumulated personality disorders.
//!
//! Long-lived severity counters for a fixed set of antagonist traits. These
//! are not keyed per player: they are the antagonist's own temperament,
//! shaped by every player it has faced. Severity only ever ratchets upward,
//! clamped to a per-trait ceiling.

use crate::now_secs;
use crate::personality::Mood;
use serde::{Deserialize, Serialize};

/// The fixed trait set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisorderTrait {
    Paranoia,
    Narcissism,
    Sociopathy,
    Anxiety,
    Depression,
    Mania,
}

impl DisorderTrait {
    /// All traits, in display order.
    pub const ALL: [DisorderTrait; 6] = [
        DisorderTrait::Paranoia,
        DisorderTrait::Narcissism,
        DisorderTrait::Sociopathy,
        DisorderTrait::Anxiety,
        DisorderTrait::Depression,
        DisorderTrait::Mania,
    ];

    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            DisorderTrait::Paranoia => "paranoia",
            DisorderTrait::Narcissism => "narcissism",
            DisorderTrait::Sociopathy => "sociopathy",
            DisorderTrait::Anxiety => "anxiety",
            DisorderTrait::Depression => "depression",
            DisorderTrait::Mania => "mania",
        }
    }

    /// Severity ceiling for this trait.
    pub fn max_severity(&self) -> u8 {
        match self {
            DisorderTrait::Paranoia => 10,
            DisorderTrait::Sociopathy => 10,
            DisorderTrait::Depression => 9,
            DisorderTrait::Narcissism => 8,
            DisorderTrait::Anxiety => 7,
            DisorderTrait::Mania => 6,
        }
    }

    /// Moods this trait expresses itself through.
    pub fn linked_moods(&self) -> &'static [Mood] {
        match self {
            DisorderTrait::Paranoia => &[Mood::Suspicious, Mood::Threatening],
            DisorderTrait::Narcissism => &[Mood::Friendly, Mood::Threatening],
            DisorderTrait::Sociopathy => &[Mood::Hostile, Mood::Threatening],
            DisorderTrait::Anxiety => &[Mood::Suspicious, Mood::Neutral],
            DisorderTrait::Depression => &[Mood::Neutral, Mood::Hostile],
            DisorderTrait::Mania => &[Mood::Friendly, Mood::Helpful],
        }
    }

    /// Player language that feeds this trait.
    pub fn trigger_keywords(&self) -> &'static [&'static str] {
        match self {
            DisorderTrait::Paranoia => &["watch", "follow", "spy"],
            DisorderTrait::Narcissism => &["praise", "admire", "worship"],
            DisorderTrait::Sociopathy => &["trust", "believe", "depend"],
            DisorderTrait::Anxiety => &["unpredictable", "random", "chaos"],
            DisorderTrait::Depression => &["alone", "pointless", "empty"],
            DisorderTrait::Mania => &["risk", "gamble", "danger"],
        }
    }
}

/// One developed disorder and its current severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisorderRecord {
    pub kind: DisorderTrait,
    pub severity: u8,
    pub developed_at: u64,
    pub linked_moods: Vec<Mood>,
    pub trigger_keywords: Vec<String>,
}

/// The antagonist's accumulated disorders. At most one record per trait.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisorderAccumulator {
    records: Vec<DisorderRecord>,
}

impl DisorderAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a trait's severity, creating the record on first development.
    /// Severity never decreases and never exceeds the trait's ceiling.
    pub fn develop(&mut self, kind: DisorderTrait, severity_delta: u8) -> &DisorderRecord {
        let max = kind.max_severity();
        let index = match self.records.iter().position(|r| r.kind == kind) {
            Some(index) => {
                let record = &mut self.records[index];
                record.severity = record.severity.saturating_add(severity_delta).min(max);
                index
            }
            None => {
                self.records.push(DisorderRecord {
                    kind,
                    severity: severity_delta.min(max),
                    developed_at: now_secs(),
                    linked_moods: kind.linked_moods().to_vec(),
                    trigger_keywords: kind
                        .trigger_keywords()
                        .iter()
                        .map(|k| k.to_string())
                        .collect(),
                });
                self.records.len() - 1
            }
        };
        &self.records[index]
    }

    /// Current severity for a trait (0 if undeveloped).
    pub fn severity(&self, kind: DisorderTrait) -> u8 {
        self.records
            .iter()
            .find(|r| r.kind == kind)
            .map(|r| r.severity)
            .unwrap_or(0)
    }

    /// Check whether a trait has developed at all.
    pub fn has(&self, kind: DisorderTrait) -> bool {
        self.severity(kind) > 0
    }

    /// All developed disorders, in development order.
    pub fn records(&self) -> &[DisorderRecord] {
        &self.records
    }

    /// Re-establish severity ceilings after an untrusted load.
    pub(crate) fn normalize(&mut self) {
        for record in &mut self.records {
            record.severity = record.severity.min(record.kind.max_severity());
        }
        self.records.dedup_by_key(|r| r.kind);
    }
}
