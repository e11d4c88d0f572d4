//! The antagonist's personality state machine.
//!
//! Holds the global mood/trust/suspicion scalars and runs the per-round
//! update: keyword deltas, an independent suspicion drift, a fixed-priority
//! mood table, and a small chance of a chaotic mood override. The drift and
//! the override both draw from an injected RNG so tests can pin every
//! transition with a seed.

use crate::now_secs;
use crate::signals;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How many recent choices the antagonist keeps verbatim.
pub const RECENT_CHOICE_CAPACITY: usize = 10;

/// Probability that an update discards the computed mood for a random one.
const CHAOS_RATE: f64 = 0.05;

/// Maximum magnitude of the per-update suspicion drift.
const SUSPICION_JITTER: i32 = 5;

/// Moods the override can land on. Hostile is deliberately excluded: the
/// antagonist only goes fully hostile when the player earns it.
const CHAOS_MOODS: [Mood; 5] = [
    Mood::Friendly,
    Mood::Suspicious,
    Mood::Helpful,
    Mood::Threatening,
    Mood::Neutral,
];

/// The antagonist's discrete behavioral state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mood {
    #[default]
    Neutral,
    Friendly,
    Helpful,
    Suspicious,
    Threatening,
    Hostile,
}

impl Mood {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            Mood::Neutral => "neutral",
            Mood::Friendly => "friendly",
            Mood::Helpful => "helpful",
            Mood::Suspicious => "suspicious",
            Mood::Threatening => "threatening",
            Mood::Hostile => "hostile",
        }
    }

    /// Check if this mood reads the player as a threat.
    pub fn is_adversarial(&self) -> bool {
        matches!(self, Mood::Suspicious | Mood::Threatening | Mood::Hostile)
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One remembered choice in the recent-choice ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedChoice {
    pub choice_text: String,
    pub difficulty: u8,
    pub round: u32,
    pub timestamp: u64,
}

/// The antagonist's evolving personality scalars.
///
/// `helpfulness` is always derived from trust and suspicion; it is recomputed
/// on every update and never set directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityState {
    pub mood: Mood,
    pub trust: i32,
    pub suspicion: i32,
    pub helpfulness: i32,
    pub last_interaction_at: u64,
    pub mood_shift_count: u64,
    /// How many times the chaotic override replaced the computed mood.
    #[serde(default)]
    pub chaotic_shifts: u64,
    #[serde(default)]
    recent_choices: VecDeque<RecordedChoice>,
}

impl Default for PersonalityState {
    fn default() -> Self {
        Self {
            mood: Mood::Neutral,
            trust: 50,
            suspicion: 0,
            helpfulness: 50,
            last_interaction_at: 0,
            mood_shift_count: 0,
            chaotic_shifts: 0,
            recent_choices: VecDeque::new(),
        }
    }
}

impl PersonalityState {
    /// Create a fresh personality with default scalars.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one player choice and return the resulting mood.
    ///
    /// Empty choice text contributes zero deltas; the rest of the update
    /// (drift, mood table, override) still runs. Never fails.
    pub fn update<R: Rng>(
        &mut self,
        choice_text: &str,
        difficulty: u8,
        round: u32,
        rng: &mut R,
    ) -> Mood {
        let deltas = signals::analyze(choice_text);

        self.trust = clamp_scalar(self.trust + deltas.trust_delta);
        self.suspicion = clamp_scalar(self.suspicion + deltas.suspicion_delta);

        // Mood drift independent of the choice itself, so repeat playthroughs
        // never feel fully scripted.
        let jitter = rng.gen_range(-SUSPICION_JITTER..=SUSPICION_JITTER);
        self.suspicion = clamp_scalar(self.suspicion + jitter);

        self.helpfulness = clamp_scalar(self.trust - self.suspicion + 50);

        let mut mood = self.mood_from_scalars();

        if rng.gen_bool(CHAOS_RATE) {
            mood = CHAOS_MOODS[rng.gen_range(0..CHAOS_MOODS.len())];
            self.chaotic_shifts += 1;
        }

        if mood != self.mood {
            self.mood_shift_count += 1;
        }
        self.mood = mood;

        self.recent_choices.push_back(RecordedChoice {
            choice_text: choice_text.to_string(),
            difficulty,
            round,
            timestamp: now_secs(),
        });
        while self.recent_choices.len() > RECENT_CHOICE_CAPACITY {
            self.recent_choices.pop_front();
        }

        self.last_interaction_at = now_secs();
        mood
    }

    /// The fixed-priority mood table. First matching row wins.
    fn mood_from_scalars(&self) -> Mood {
        if self.suspicion > 70 {
            Mood::Hostile
        } else if self.suspicion > 50 {
            Mood::Threatening
        } else if self.suspicion > 30 {
            Mood::Suspicious
        } else if self.trust > 70 {
            Mood::Helpful
        } else if self.trust > 50 {
            Mood::Friendly
        } else {
            Mood::Neutral
        }
    }

    /// The recent choices, oldest first.
    pub fn recent_choices(&self) -> impl Iterator<Item = &RecordedChoice> {
        self.recent_choices.iter()
    }

    /// Re-establish numeric bounds after an untrusted load. Helpfulness is
    /// only clamped here, not re-derived: the derivation runs on every
    /// update, and re-deriving it for a defaulted state would move it off
    /// its starting value of 50.
    pub(crate) fn normalize(&mut self) {
        self.trust = clamp_scalar(self.trust);
        self.suspicion = clamp_scalar(self.suspicion);
        self.helpfulness = clamp_scalar(self.helpfulness);
        while self.recent_choices.len() > RECENT_CHOICE_CAPACITY {
            self.recent_choices.pop_front();
        }
    }
}

fn clamp_scalar(value: i32) -> i32 {
    value.clamp(0, 100)
}
