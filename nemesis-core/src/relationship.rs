//! Relationship tracking.
//!
//! Derives a discrete relationship category per player from a coarse keyword
//! pass over each interaction, accumulated into per-player trust/manipulation/
//! betrayal levels. Every update appends to a bounded shift log used for the
//! stability metric.

use crate::now_secs;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Maximum shift records retained per player.
const SHIFT_LOG_CAPACITY: usize = 20;

/// Shifts inspected by the stability metric.
const STABILITY_WINDOW: usize = 10;

/// Words in the choice that indicate the player extends trust.
const TRUST_WORDS: &[&str] = &["trust", "believe", "honest", "truth", "help", "protect"];

/// Deceptive play.
const DECEPTION_WORDS: &[&str] = &["lie", "deceive", "trick", "manipulate", "pretend"];

/// Consequence language that reads as betrayal or harm.
const BETRAYAL_WORDS: &[&str] = &["betray", "hurt", "abandon", "broken"];

/// The antagonist's stance toward a specific player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RelationshipCategory {
    Mentor,
    Friend,
    #[default]
    Acquaintance,
    Rival,
    Enemy,
    Puppet,
}

impl RelationshipCategory {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            RelationshipCategory::Mentor => "mentor",
            RelationshipCategory::Friend => "friend",
            RelationshipCategory::Acquaintance => "acquaintance",
            RelationshipCategory::Rival => "rival",
            RelationshipCategory::Enemy => "enemy",
            RelationshipCategory::Puppet => "puppet",
        }
    }
}

/// One recorded category evaluation (appended even when nothing changed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipShift {
    pub old: RelationshipCategory,
    pub new: RelationshipCategory,
    pub trigger: String,
    pub timestamp: u64,
}

/// Accumulated per-player levels, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationshipLevels {
    pub trust: f32,
    pub manipulation: f32,
    pub betrayal: f32,
}

impl Default for RelationshipLevels {
    fn default() -> Self {
        // Neutral priors for a stranger.
        Self {
            trust: 0.5,
            manipulation: 0.2,
            betrayal: 0.1,
        }
    }
}

impl RelationshipLevels {
    /// Fold one interaction sample into the accumulated level.
    ///
    /// Strong samples push the level past what any single reading could
    /// justify; weak samples pull it down faster than it rose.
    fn absorb(level: &mut f32, sample: f32) {
        if sample >= 0.7 {
            *level = (*level + 0.1).min(1.0);
        } else if sample <= 0.3 {
            *level = (*level - 0.15).max(0.0);
        } else {
            *level += (sample - *level) * 0.5;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct PlayerRelationship {
    category: RelationshipCategory,
    levels: RelationshipLevels,
    shifts: VecDeque<RelationshipShift>,
}

/// Tracks a relationship category per player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    players: HashMap<String, PlayerRelationship>,
}

impl RelationshipGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current category for a player. Unknown players are acquaintances.
    pub fn category(&self, player_id: &str) -> RelationshipCategory {
        self.players
            .get(&crate::memory::normalize_player_id(player_id))
            .map(|p| p.category)
            .unwrap_or_default()
    }

    /// Accumulated levels for a player, if any interaction has been seen.
    pub fn levels(&self, player_id: &str) -> Option<RelationshipLevels> {
        self.players
            .get(&crate::memory::normalize_player_id(player_id))
            .map(|p| p.levels)
    }

    /// Fold one interaction into the relationship and return the category.
    pub fn update(
        &mut self,
        player_id: &str,
        choice_text: &str,
        consequence_text: &str,
    ) -> RelationshipCategory {
        let key = crate::memory::normalize_player_id(player_id);
        let entry = self.players.entry(key).or_default();

        let sample = score_interaction(choice_text, consequence_text);
        RelationshipLevels::absorb(&mut entry.levels.trust, sample.trust);
        RelationshipLevels::absorb(&mut entry.levels.manipulation, sample.manipulation);
        RelationshipLevels::absorb(&mut entry.levels.betrayal, sample.betrayal);

        let old = entry.category;
        let new = categorize(&entry.levels, old);
        entry.category = new;

        entry.shifts.push_back(RelationshipShift {
            old,
            new,
            trigger: choice_text.chars().take(60).collect(),
            timestamp: now_secs(),
        });
        while entry.shifts.len() > SHIFT_LOG_CAPACITY {
            entry.shifts.pop_front();
        }

        new
    }

    /// Stability of the relationship: `1 - transitions / window` over the
    /// last ten evaluations. A player who never changes category scores 1.0.
    pub fn stability(&self, player_id: &str) -> f32 {
        let Some(entry) = self
            .players
            .get(&crate::memory::normalize_player_id(player_id))
        else {
            return 1.0;
        };

        let transitions = entry
            .shifts
            .iter()
            .rev()
            .take(STABILITY_WINDOW)
            .filter(|s| s.old != s.new)
            .count();
        1.0 - transitions as f32 / STABILITY_WINDOW as f32
    }

    /// Shift history for a player, oldest first.
    pub fn shifts(&self, player_id: &str) -> impl Iterator<Item = &RelationshipShift> {
        self.players
            .get(&crate::memory::normalize_player_id(player_id))
            .into_iter()
            .flat_map(|entry| entry.shifts.iter())
    }

    /// Snapshot of every tracked player's category.
    pub fn categories(&self) -> HashMap<String, RelationshipCategory> {
        self.players
            .iter()
            .map(|(id, p)| (id.clone(), p.category))
            .collect()
    }

    /// Forget a player entirely (the "reset relationship" action).
    pub fn reset(&mut self, player_id: &str) -> bool {
        self.players
            .remove(&crate::memory::normalize_player_id(player_id))
            .is_some()
    }
}

/// The coarse per-interaction keyword pass.
fn score_interaction(choice_text: &str, consequence_text: &str) -> RelationshipLevels {
    let choice = choice_text.to_lowercase();
    let consequence = consequence_text.to_lowercase();

    RelationshipLevels {
        trust: if TRUST_WORDS.iter().any(|w| choice.contains(w)) {
            0.8
        } else {
            0.3
        },
        manipulation: if DECEPTION_WORDS.iter().any(|w| choice.contains(w)) {
            0.9
        } else {
            0.2
        },
        betrayal: if BETRAYAL_WORDS.iter().any(|w| consequence.contains(w)) {
            0.8
        } else {
            0.1
        },
    }
}

/// Ordered guard table; the first matching row wins, otherwise the category
/// is kept as-is.
fn categorize(levels: &RelationshipLevels, prior: RelationshipCategory) -> RelationshipCategory {
    if levels.trust > 0.9 && levels.manipulation < 0.2 {
        RelationshipCategory::Mentor
    } else if levels.trust > 0.7 && levels.manipulation < 0.3 {
        RelationshipCategory::Friend
    } else if levels.manipulation > 0.8 && levels.trust < 0.3 {
        RelationshipCategory::Puppet
    } else if levels.betrayal > 0.7 {
        RelationshipCategory::Enemy
    } else if levels.manipulation > 0.6 {
        RelationshipCategory::Rival
    } else {
        prior
    }
}
