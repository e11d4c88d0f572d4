//! Fear pattern extraction.
//!
//! Classifies question/consequence text into a weighted histogram of fear
//! categories. The engine never acts on these directly; they accumulate in
//! player memory and feed the downstream content generator's personalized
//! taunts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The fixed set of fear themes the taxonomy recognizes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum FearCategory {
    Death,
    Abandonment,
    Failure,
    Betrayal,
    TheUnknown,
    Pain,
    Loss,
    Exposure,
}

impl FearCategory {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            FearCategory::Death => "death",
            FearCategory::Abandonment => "abandonment",
            FearCategory::Failure => "failure",
            FearCategory::Betrayal => "betrayal",
            FearCategory::TheUnknown => "the unknown",
            FearCategory::Pain => "pain",
            FearCategory::Loss => "loss",
            FearCategory::Exposure => "exposure",
        }
    }
}

/// Keyword taxonomy: (keyword, category, weight). All matches accumulate.
const FEAR_RULES: &[(&str, FearCategory, f32)] = &[
    ("die", FearCategory::Death, 1.0),
    ("death", FearCategory::Death, 1.0),
    ("kill", FearCategory::Death, 0.8),
    ("grave", FearCategory::Death, 0.6),
    ("alone", FearCategory::Abandonment, 1.0),
    ("abandon", FearCategory::Abandonment, 1.0),
    ("leave", FearCategory::Abandonment, 0.5),
    ("forgotten", FearCategory::Abandonment, 0.7),
    ("fail", FearCategory::Failure, 1.0),
    ("mistake", FearCategory::Failure, 0.6),
    ("ruin", FearCategory::Failure, 0.7),
    ("betray", FearCategory::Betrayal, 1.0),
    ("deceive", FearCategory::Betrayal, 0.8),
    ("backstab", FearCategory::Betrayal, 1.0),
    ("dark", FearCategory::TheUnknown, 0.6),
    ("unknown", FearCategory::TheUnknown, 1.0),
    ("stranger", FearCategory::TheUnknown, 0.5),
    ("hurt", FearCategory::Pain, 0.8),
    ("pain", FearCategory::Pain, 1.0),
    ("suffer", FearCategory::Pain, 0.9),
    ("lose", FearCategory::Loss, 0.8),
    ("lost", FearCategory::Loss, 0.8),
    ("gone", FearCategory::Loss, 0.5),
    ("secret", FearCategory::Exposure, 0.8),
    ("exposed", FearCategory::Exposure, 1.0),
    ("shame", FearCategory::Exposure, 0.7),
];

/// Extract a weighted fear histogram from a question and its consequence.
///
/// The result is sorted by weight descending (category order breaks ties), so
/// the first entry is the dominant theme. Pure and deterministic.
pub fn extract_fear_weights(question: &str, consequence: &str) -> Vec<(FearCategory, f32)> {
    let text = format!("{} {}", question, consequence).to_lowercase();
    let mut weights: HashMap<FearCategory, f32> = HashMap::new();

    for &(keyword, category, weight) in FEAR_RULES {
        if text.contains(keyword) {
            *weights.entry(category).or_insert(0.0) += weight;
        }
    }

    let mut out: Vec<(FearCategory, f32)> = weights.into_iter().collect();
    out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
    out
}
