//! Betrayal planning and execution.
//!
//! Plans are created speculatively from an assembled probability and resolved
//! opportunistically: a pending plan only fires on a round where the player's
//! own words show trust or vulnerability. At most one pending plan exists per
//! target; a new draw while one is pending is a no-op.

use crate::now_secs;
use crate::relationship::RelationshipCategory;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Consequence tags attached to executed plans.
pub const TAG_TRUST_BROKEN: &str = "player_trust_broken";
pub const TAG_RELATIONSHIP_DAMAGED: &str = "relationship_damaged";
pub const TAG_PSYCHOLOGICAL_IMPACT: &str = "psychological_impact";

/// Choice language that opens the execution window.
const OPPORTUNITY_WORDS: &[&str] = &[
    "trust", "believe", "vulnerable", "confide", "depend", "rely", "open up", "faith",
];

/// Unique identifier for a betrayal plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(Uuid);

impl PlanId {
    /// Create a new unique plan ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The shape a betrayal takes when it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetrayalKind {
    FalsePromise,
    TrustShatter,
    SecretReveal,
    Abandonment,
}

impl BetrayalKind {
    const ALL: [BetrayalKind; 4] = [
        BetrayalKind::FalsePromise,
        BetrayalKind::TrustShatter,
        BetrayalKind::SecretReveal,
        BetrayalKind::Abandonment,
    ];

    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            BetrayalKind::FalsePromise => "false promise",
            BetrayalKind::TrustShatter => "trust shatter",
            BetrayalKind::SecretReveal => "secret reveal",
            BetrayalKind::Abandonment => "abandonment",
        }
    }
}

/// A scheduled betrayal against one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetrayalPlan {
    pub id: PlanId,
    pub target_player_id: String,
    pub kind: BetrayalKind,
    pub planned_at: u64,
    pub executed: bool,
    pub success: bool,
    pub consequences: Vec<String>,
}

/// Relationship-specific offset added to the betrayal probability. The closer
/// the antagonist pretends to be, the less it schemes.
pub fn category_offset(category: RelationshipCategory) -> f64 {
    match category {
        RelationshipCategory::Mentor => 0.10,
        RelationshipCategory::Friend => 0.20,
        RelationshipCategory::Acquaintance => 0.30,
        RelationshipCategory::Rival => 0.60,
        RelationshipCategory::Puppet => 0.70,
        RelationshipCategory::Enemy => 0.80,
    }
}

/// Check whether the choice text opens an execution window.
pub fn has_opportunity(choice_text: &str) -> bool {
    let lower = choice_text.to_lowercase();
    OPPORTUNITY_WORDS.iter().any(|w| lower.contains(w))
}

/// Creates and resolves betrayal plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BetrayalPlanner {
    plans: Vec<BetrayalPlan>,
}

impl BetrayalPlanner {
    /// Create an empty planner.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending (unexecuted) plan for a target, if one exists.
    pub fn pending_for(&self, target: &str) -> Option<&BetrayalPlan> {
        let key = crate::memory::normalize_player_id(target);
        self.plans
            .iter()
            .find(|p| !p.executed && p.target_player_id == key)
    }

    /// Maybe schedule a betrayal against a target.
    ///
    /// A single draw against `probability` decides; a target with a plan
    /// already pending never gets a second one. Returns the new plan.
    pub fn plan<R: Rng>(
        &mut self,
        target: &str,
        probability: f64,
        rng: &mut R,
    ) -> Option<&BetrayalPlan> {
        if self.pending_for(target).is_some() {
            return None;
        }
        if !rng.gen_bool(probability.clamp(0.0, 1.0)) {
            return None;
        }

        let kind = BetrayalKind::ALL[rng.gen_range(0..BetrayalKind::ALL.len())];
        self.plans.push(BetrayalPlan {
            id: PlanId::new(),
            target_player_id: crate::memory::normalize_player_id(target),
            kind,
            planned_at: now_secs(),
            executed: false,
            success: false,
            consequences: Vec::new(),
        });
        self.plans.last()
    }

    /// Try to resolve the pending plan against a target this round.
    ///
    /// Fires only when the choice text shows trust or vulnerability; success
    /// is then an even draw. Returns the resolved plan, or `None` when no
    /// betrayal occurred this round (never an error).
    pub fn execute<R: Rng>(
        &mut self,
        target: &str,
        choice_text: &str,
        rng: &mut R,
    ) -> Option<BetrayalPlan> {
        if !has_opportunity(choice_text) {
            return None;
        }

        let key = crate::memory::normalize_player_id(target);
        let plan = self
            .plans
            .iter_mut()
            .find(|p| !p.executed && p.target_player_id == key)?;

        plan.executed = true;
        plan.success = rng.gen_bool(0.5);
        plan.consequences = if plan.success {
            vec![
                TAG_TRUST_BROKEN.to_string(),
                TAG_RELATIONSHIP_DAMAGED.to_string(),
                TAG_PSYCHOLOGICAL_IMPACT.to_string(),
            ]
        } else {
            vec![TAG_PSYCHOLOGICAL_IMPACT.to_string()]
        };

        Some(plan.clone())
    }

    /// All plans ever made, pending and resolved.
    pub fn plans(&self) -> &[BetrayalPlan] {
        &self.plans
    }
}
