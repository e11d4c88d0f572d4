//! Per-player memory.
//!
//! The antagonist's record of everything a specific player has done: bounded
//! choice-pattern history, trust snapshots, discovered secrets, emotional
//! attachments, and manipulation/betrayal counters. The store is the sole
//! writer; callers only ever see shared references.

use crate::fears::{self, FearCategory};
use crate::now_secs;
use crate::personality::Mood;
use crate::signals;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Maximum choice patterns remembered per player.
pub const PATTERN_HISTORY_CAPACITY: usize = 50;

/// Attachments below this impact are not worth remembering.
pub const ATTACHMENT_THRESHOLD: f32 = 0.7;

/// Window of recent patterns the behaviour profile looks at.
const PROFILE_WINDOW: usize = 10;

/// Words that suggest the player just revealed something private.
const SECRET_WORDS: &[&str] = &["secret", "hidden", "confess", "never told", "private", "ashamed"];

/// Words that mark the player as open to manipulation.
const MANIPULATION_WORDS: &[&str] = &["trust", "believe", "depend", "rely", "faith"];

/// Consequence language that opens a betrayal window.
const BETRAYAL_WORDS: &[&str] = &["hurt", "betray", "abandon", "broken", "wound"];

/// Normalize a raw player identifier into the store's lookup key.
pub fn normalize_player_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Classified features of one recorded interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChoicePattern {
    /// Net goodwill of the text (positive = kind, negative = threatening).
    pub signal_score: i32,
    pub contains_secret: bool,
    pub manipulation_potential: f32,
    pub betrayal_opportunity: f32,
}

/// Something private the player let slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub label: String,
    pub discovered_at: u64,
    pub used_for_manipulation: bool,
}

/// A choice the player seemed to care deeply about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalAttachment {
    pub choice_text: String,
    pub impact: f32,
    pub timestamp: u64,
}

/// Behaviour flags derived from the recent pattern window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorProfile {
    pub risk_taker: bool,
    pub trusting: bool,
    pub manipulative: bool,
    pub unpredictable: bool,
    pub consistent: bool,
}

/// Everything the antagonist remembers about one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerMemory {
    pub first_encounter_at: u64,
    pub total_interactions: u64,
    pub choice_pattern_history: VecDeque<ChoicePattern>,
    /// Trust snapshot taken at each interaction; read through `recent_trust`.
    pub trust_history: Vec<i32>,
    pub secrets: Vec<Secret>,
    pub emotional_attachments: Vec<EmotionalAttachment>,
    pub manipulation_attempts: u32,
    pub successful_betrayals: u32,
    /// Accumulated fear-theme weights across every question seen.
    #[serde(default)]
    pub fear_weights: HashMap<FearCategory, f32>,
}

impl PlayerMemory {
    /// The last `n` trust snapshots, oldest first.
    pub fn recent_trust(&self, n: usize) -> &[i32] {
        let start = self.trust_history.len().saturating_sub(n);
        &self.trust_history[start..]
    }

    /// The fear theme with the most accumulated weight, if any.
    pub fn dominant_fear(&self) -> Option<FearCategory> {
        let mut entries: Vec<(&FearCategory, &f32)> = self.fear_weights.iter().collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(b.0))
        });
        entries.first().map(|(category, _)| **category)
    }

    /// Classify the player's recent behaviour from the last pattern window.
    ///
    /// The unpredictable/consistent reads are deliberately noisy draws rather
    /// than real sequence analysis; they only activate once the sample is
    /// large enough to pretend to mean something.
    pub fn behavior_profile<R: Rng>(&self, rng: &mut R) -> BehaviorProfile {
        let window: Vec<&ChoicePattern> = self
            .choice_pattern_history
            .iter()
            .rev()
            .take(PROFILE_WINDOW)
            .collect();

        let risky = window.iter().filter(|p| p.betrayal_opportunity > 0.7).count();
        let open = window.iter().filter(|p| p.manipulation_potential > 0.7).count();

        let mut profile = BehaviorProfile {
            risk_taker: risky > 3,
            trusting: open > 5,
            manipulative: self.manipulation_attempts > 2,
            unpredictable: false,
            consistent: false,
        };

        if window.len() > 5 {
            profile.unpredictable = rng.gen_bool(0.3);
            profile.consistent = rng.gen_bool(0.4);
        }

        profile
    }
}

/// The store of per-player memories, keyed by normalized identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerMemoryStore {
    players: HashMap<String, PlayerMemory>,
}

impl PlayerMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a player's memory without creating one.
    pub fn get(&self, player_id: &str) -> Option<&PlayerMemory> {
        self.players.get(&normalize_player_id(player_id))
    }

    /// Number of players the antagonist remembers.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Iterate over `(normalized_id, memory)` pairs.
    pub fn players(&self) -> impl Iterator<Item = (&String, &PlayerMemory)> {
        self.players.iter()
    }

    /// Record one interaction for a player, creating the record on first use.
    ///
    /// `current_mood` and `trust_snapshot` come from the global personality
    /// state at the time of the call.
    pub fn record_interaction(
        &mut self,
        player_id: &str,
        choice_text: &str,
        consequence_text: &str,
        current_mood: Mood,
        trust_snapshot: i32,
    ) {
        let key = normalize_player_id(player_id);
        let now = now_secs();
        let memory = self.players.entry(key).or_insert_with(|| PlayerMemory {
            first_encounter_at: now,
            ..PlayerMemory::default()
        });

        let pattern = classify_pattern(choice_text, consequence_text);

        memory.total_interactions += 1;
        memory.choice_pattern_history.push_back(pattern);
        while memory.choice_pattern_history.len() > PATTERN_HISTORY_CAPACITY {
            memory.choice_pattern_history.pop_front();
        }
        memory.trust_history.push(trust_snapshot);

        if pattern.contains_secret {
            memory.secrets.push(Secret {
                label: truncate_label(choice_text),
                discovered_at: now,
                used_for_manipulation: false,
            });
        }

        let impact = emotional_impact(choice_text, consequence_text);
        if impact > ATTACHMENT_THRESHOLD {
            memory.emotional_attachments.push(EmotionalAttachment {
                choice_text: choice_text.to_string(),
                impact,
                timestamp: now,
            });
        }

        if current_mood.is_adversarial() {
            memory.manipulation_attempts += 1;
        }

        for (category, weight) in fears::extract_fear_weights(choice_text, consequence_text) {
            *memory.fear_weights.entry(category).or_insert(0.0) += weight;
        }
    }

    /// Credit a successful betrayal against a player. Every secret the
    /// antagonist held on them counts as ammunition for it.
    pub(crate) fn note_betrayal_success(&mut self, player_id: &str) {
        if let Some(memory) = self.players.get_mut(&normalize_player_id(player_id)) {
            memory.successful_betrayals += 1;
            for secret in &mut memory.secrets {
                secret.used_for_manipulation = true;
            }
        }
    }

    /// Explicit "reset relationship" action: forget the player entirely.
    pub fn reset(&mut self, player_id: &str) -> bool {
        self.players.remove(&normalize_player_id(player_id)).is_some()
    }

    /// Re-establish bounds after an untrusted load.
    pub(crate) fn normalize(&mut self) {
        for memory in self.players.values_mut() {
            while memory.choice_pattern_history.len() > PATTERN_HISTORY_CAPACITY {
                memory.choice_pattern_history.pop_front();
            }
            memory
                .emotional_attachments
                .retain(|a| a.impact > ATTACHMENT_THRESHOLD);
        }
    }
}

/// Classify one interaction's text into a choice pattern.
fn classify_pattern(choice_text: &str, consequence_text: &str) -> ChoicePattern {
    let combined = format!("{} {}", choice_text, consequence_text).to_lowercase();
    let choice_lower = choice_text.to_lowercase();
    let consequence_lower = consequence_text.to_lowercase();

    let signal = signals::analyze(&choice_lower).combine(signals::analyze(&consequence_lower));

    let contains_secret = SECRET_WORDS.iter().any(|w| combined.contains(w));
    let manipulation_potential = if MANIPULATION_WORDS.iter().any(|w| combined.contains(w)) {
        0.8
    } else {
        0.2
    };
    let betrayal_opportunity = if BETRAYAL_WORDS.iter().any(|w| consequence_lower.contains(w)) {
        0.8
    } else {
        0.1
    };

    ChoicePattern {
        signal_score: signal.score(),
        contains_secret,
        manipulation_potential,
        betrayal_opportunity,
    }
}

/// How much the player seemed to care, from the sheer weight of the language.
fn emotional_impact(choice_text: &str, consequence_text: &str) -> f32 {
    let signal = signals::analyze(choice_text).combine(signals::analyze(consequence_text));
    let magnitude = (signal.trust_delta.abs() + signal.suspicion_delta.abs()) as f32;
    (magnitude / 20.0).clamp(0.0, 1.0)
}

fn truncate_label(text: &str) -> String {
    text.chars().take(60).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_player_id_normalization() {
        assert_eq!(normalize_player_id("  Alex "), "alex");
        assert_eq!(normalize_player_id("ALEX"), "alex");
    }

    #[test]
    fn test_lazy_creation_and_lookup() {
        let mut store = PlayerMemoryStore::new();
        assert!(store.get("alex").is_none());

        store.record_interaction("  Alex ", "I help", "", Mood::Neutral, 55);
        let memory = store.get("ALEX").expect("record should exist");
        assert_eq!(memory.total_interactions, 1);
        assert_eq!(memory.trust_history, vec![55]);
    }

    #[test]
    fn test_pattern_history_is_bounded() {
        let mut store = PlayerMemoryStore::new();
        for _ in 0..80 {
            store.record_interaction("alex", "I hide", "", Mood::Neutral, 50);
        }
        let memory = store.get("alex").unwrap();
        assert_eq!(memory.choice_pattern_history.len(), PATTERN_HISTORY_CAPACITY);
        assert_eq!(memory.total_interactions, 80);
    }

    #[test]
    fn test_secret_detection() {
        let mut store = PlayerMemoryStore::new();
        store.record_interaction("alex", "I confess my secret fear", "", Mood::Neutral, 50);
        let memory = store.get("alex").unwrap();
        assert_eq!(memory.secrets.len(), 1);
        assert!(!memory.secrets[0].used_for_manipulation);
    }

    #[test]
    fn test_attachment_threshold() {
        let mut store = PlayerMemoryStore::new();
        // Mild language: below threshold, no attachment.
        store.record_interaction("alex", "I hide", "", Mood::Neutral, 50);
        // Heavy language: above threshold.
        store.record_interaction("alex", "I kill to protect them", "They are hurt", Mood::Neutral, 50);
        let memory = store.get("alex").unwrap();
        assert_eq!(memory.emotional_attachments.len(), 1);
        assert!(memory.emotional_attachments[0].impact > ATTACHMENT_THRESHOLD);
    }

    #[test]
    fn test_manipulation_counter_follows_mood() {
        let mut store = PlayerMemoryStore::new();
        store.record_interaction("alex", "I wait", "", Mood::Friendly, 50);
        store.record_interaction("alex", "I wait", "", Mood::Suspicious, 50);
        store.record_interaction("alex", "I wait", "", Mood::Hostile, 50);
        assert_eq!(store.get("alex").unwrap().manipulation_attempts, 2);
    }

    #[test]
    fn test_betrayal_success_spends_secrets() {
        let mut store = PlayerMemoryStore::new();
        store.record_interaction("alex", "I confess my secret fear", "", Mood::Neutral, 50);
        assert!(!store.get("alex").unwrap().secrets[0].used_for_manipulation);

        store.note_betrayal_success("Alex");

        let memory = store.get("alex").unwrap();
        assert_eq!(memory.successful_betrayals, 1);
        assert!(memory.secrets.iter().all(|s| s.used_for_manipulation));
    }

    #[test]
    fn test_behavior_profile_flags() {
        let mut store = PlayerMemoryStore::new();
        for _ in 0..6 {
            store.record_interaction(
                "alex",
                "I trust you and believe you",
                "They hurt me anyway",
                Mood::Neutral,
                50,
            );
        }
        let mut rng = StdRng::seed_from_u64(9);
        let profile = store.get("alex").unwrap().behavior_profile(&mut rng);
        assert!(profile.risk_taker);
        assert!(profile.trusting);
        assert!(!profile.manipulative);
    }

    #[test]
    fn test_dominant_fear_accumulates() {
        let mut store = PlayerMemoryStore::new();
        store.record_interaction("alex", "Would you die for them?", "You die alone", Mood::Neutral, 50);
        store.record_interaction("alex", "Face death again", "", Mood::Neutral, 50);
        assert_eq!(store.get("alex").unwrap().dominant_fear(), Some(FearCategory::Death));
    }

    #[test]
    fn test_reset_forgets_player() {
        let mut store = PlayerMemoryStore::new();
        store.record_interaction("alex", "I help", "", Mood::Neutral, 50);
        assert!(store.reset("Alex"));
        assert!(store.get("alex").is_none());
        assert!(!store.reset("alex"));
    }
}
