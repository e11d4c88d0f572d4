//! The engine facade.
//!
//! One `NemesisEngine` instance owns every piece of mutable antagonist state
//! and the RNG behind all randomized behavior. Nothing in this module is a
//! process-wide global: callers that run several games at once simply hold
//! several engines. All operations are synchronous; the caller persists the
//! engine at session boundaries via [`NemesisEngine::serialize`] and
//! [`NemesisEngine::load`].

use crate::betrayal::{self, BetrayalPlan, BetrayalPlanner};
use crate::disorders::{DisorderAccumulator, DisorderRecord, DisorderTrait};
use crate::lies::{self, IdentityClaim, LieRecord};
use crate::memory::{PlayerMemory, PlayerMemoryStore};
use crate::persist::SavedEngine;
use crate::personality::{Mood, PersonalityState};
use crate::relationship::{RelationshipCategory, RelationshipGraph};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Starting value for the adaptation-rate scalar.
const BASE_ADAPTATION_RATE: f64 = 0.1;

/// Starting value for the betrayal-probability scalar.
const BASE_BETRAYAL_PROBABILITY: f64 = 0.1;

/// Probability bonus per relevant developed disorder.
const DISORDER_BETRAYAL_BONUS: f64 = 0.15;

/// Probability bonus per past successful betrayal of the target.
const PAST_SUCCESS_BONUS: f64 = 0.1;

/// Per-round metadata supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundContext {
    pub difficulty: u8,
    pub round: u32,
}

/// Everything the content layer needs to phrase one round's reaction.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub mood: Mood,
    pub relationship: RelationshipCategory,
    /// A betrayal that resolved this round, if any. Pending plans stay
    /// hidden until they fire.
    pub betrayal: Option<BetrayalPlan>,
    pub disorders: Vec<DisorderRecord>,
}

/// The antagonist engine: personality, memory, relationships, disorders and
/// betrayal planning behind a single synchronous API.
#[derive(Debug)]
pub struct NemesisEngine {
    personality: PersonalityState,
    memory: PlayerMemoryStore,
    relationships: RelationshipGraph,
    disorders: DisorderAccumulator,
    planner: BetrayalPlanner,
    adaptation_rate: f64,
    betrayal_probability: f64,
    rng: StdRng,
}

impl Default for NemesisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NemesisEngine {
    /// Create an engine with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an engine with a fixed seed. Every jitter, chaotic mood
    /// override and betrayal draw becomes reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            personality: PersonalityState::default(),
            memory: PlayerMemoryStore::new(),
            relationships: RelationshipGraph::new(),
            disorders: DisorderAccumulator::new(),
            planner: BetrayalPlanner::new(),
            adaptation_rate: BASE_ADAPTATION_RATE,
            betrayal_probability: BASE_BETRAYAL_PROBABILITY,
            rng,
        }
    }

    /// The single per-round entry point.
    ///
    /// Runs the full reaction pipeline: signal analysis and mood update,
    /// memory recording, relationship reclassification, temperament
    /// evolution, then betrayal planning and resolution. Malformed input
    /// (empty text, unknown player) degrades to neutral behavior; this
    /// method never fails.
    pub fn record_choice(
        &mut self,
        player_id: &str,
        choice_text: &str,
        consequence_text: &str,
        context: RoundContext,
    ) -> RoundOutcome {
        let mood =
            self.personality
                .update(choice_text, context.difficulty, context.round, &mut self.rng);

        self.memory.record_interaction(
            player_id,
            choice_text,
            consequence_text,
            mood,
            self.personality.trust,
        );

        let relationship = self
            .relationships
            .update(player_id, choice_text, consequence_text);

        self.evolve(player_id);

        let betrayal = self.run_betrayal(player_id, choice_text, relationship);

        RoundOutcome {
            mood,
            relationship,
            betrayal,
            disorders: self.disorders.records().to_vec(),
        }
    }

    /// Temperament evolution: read the player's recent behaviour and let it
    /// leave a mark on the antagonist itself.
    fn evolve(&mut self, player_id: &str) {
        let Some(memory) = self.memory.get(player_id) else {
            return;
        };
        let profile = memory.behavior_profile(&mut self.rng);

        if profile.risk_taker {
            self.disorders.develop(DisorderTrait::Mania, 1);
            self.raise_adaptation();
        }
        if profile.trusting {
            self.disorders.develop(DisorderTrait::Sociopathy, 1);
            self.raise_adaptation();
        }
        if profile.manipulative {
            self.disorders.develop(DisorderTrait::Narcissism, 1);
            self.raise_adaptation();
        }
        if profile.unpredictable {
            self.disorders.develop(DisorderTrait::Anxiety, 1);
            self.raise_adaptation();
        }
        if profile.consistent {
            self.disorders.develop(DisorderTrait::Paranoia, 1);
            self.raise_adaptation();
        }
    }

    fn raise_adaptation(&mut self) {
        self.adaptation_rate = (self.adaptation_rate + 0.01).min(1.0);
        self.betrayal_probability = (self.betrayal_probability + 0.02).min(1.0);
    }

    /// Assemble this round's betrayal probability, maybe schedule a plan,
    /// then try to resolve whatever plan is pending.
    fn run_betrayal(
        &mut self,
        player_id: &str,
        choice_text: &str,
        relationship: RelationshipCategory,
    ) -> Option<BetrayalPlan> {
        let probability = self.betrayal_probability_for(player_id, relationship);
        self.planner.plan(player_id, probability, &mut self.rng);

        let resolved = self.planner.execute(player_id, choice_text, &mut self.rng);
        if let Some(plan) = &resolved {
            if plan.success {
                self.memory.note_betrayal_success(player_id);
            } else {
                // A betrayal that misfires stings the antagonist too.
                self.disorders.develop(DisorderTrait::Depression, 1);
            }
        }
        resolved
    }

    fn betrayal_probability_for(
        &self,
        player_id: &str,
        relationship: RelationshipCategory,
    ) -> f64 {
        let disorder_bonus = [
            DisorderTrait::Sociopathy,
            DisorderTrait::Narcissism,
            DisorderTrait::Paranoia,
        ]
        .iter()
        .filter(|&&kind| self.disorders.has(kind))
        .count() as f64
            * DISORDER_BETRAYAL_BONUS;

        let past_successes = self
            .memory
            .get(player_id)
            .map(|m| m.successful_betrayals)
            .unwrap_or(0) as f64;

        self.betrayal_probability
            + betrayal::category_offset(relationship)
            + disorder_bonus
            + past_successes * PAST_SUCCESS_BONUS
    }

    /// Reset the personality for a new game. Player memories, relationships
    /// and the antagonist's own disorders persist across games.
    pub fn reset_for_new_game(&mut self) {
        self.personality = PersonalityState::default();
    }

    /// The explicit "reset relationship" user action: forget one player.
    pub fn reset_relationship(&mut self, player_id: &str) {
        self.memory.reset(player_id);
        self.relationships.reset(player_id);
    }

    // =========================================================================
    // Snapshot accessors (read-only views for UI and debug panels)
    // =========================================================================

    /// The current global personality state.
    pub fn personality(&self) -> &PersonalityState {
        &self.personality
    }

    /// Memory for one player, if any interaction has been recorded.
    pub fn memory(&self, player_id: &str) -> Option<&PlayerMemory> {
        self.memory.get(player_id)
    }

    /// The relationship graph.
    pub fn relationships(&self) -> &RelationshipGraph {
        &self.relationships
    }

    /// All developed disorders.
    pub fn disorders(&self) -> &[DisorderRecord] {
        self.disorders.records()
    }

    /// All betrayal plans, pending and resolved.
    pub fn betrayal_plans(&self) -> &[BetrayalPlan] {
        self.planner.plans()
    }

    /// Current adaptation-rate scalar.
    pub fn adaptation_rate(&self) -> f64 {
        self.adaptation_rate
    }

    /// Current betrayal-probability scalar.
    pub fn betrayal_probability(&self) -> f64 {
        self.betrayal_probability
    }

    /// Run the lie-detection heuristic. Independent of the round flow; pure.
    pub fn detect_lies(
        &self,
        claimed: &IdentityClaim,
        response_history: &[IdentityClaim],
    ) -> Vec<LieRecord> {
        lies::detect(claimed, response_history)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Serialize the whole engine to a JSON blob. The RNG is not part of the
    /// snapshot.
    pub fn serialize(&self) -> String {
        SavedEngine {
            version: crate::persist::SAVE_VERSION,
            signal_table_version: crate::signals::SIGNAL_TABLE_VERSION,
            saved_at: crate::now_secs(),
            personality: self.personality.clone(),
            memory: self.memory.clone(),
            relationships: self.relationships.clone(),
            disorders: self.disorders.clone(),
            plans: self.planner.clone(),
            adaptation_rate: self.adaptation_rate,
            betrayal_probability: self.betrayal_probability,
        }
        .to_json()
    }

    /// Restore engine state from a blob produced by [`serialize`].
    ///
    /// Corrupt sections fall back to defaults instead of failing the load; a
    /// blob that is not JSON at all restores a fresh engine. The RNG keeps
    /// its current stream.
    ///
    /// [`serialize`]: NemesisEngine::serialize
    pub fn load(&mut self, blob: &str) {
        let saved = SavedEngine::from_json(blob);
        self.personality = saved.personality;
        self.memory = saved.memory;
        self.relationships = saved.relationships;
        self.disorders = saved.disorders;
        self.planner = saved.plans;
        self.adaptation_rate = saved.adaptation_rate.clamp(0.0, 1.0);
        self.betrayal_probability = saved.betrayal_probability.clamp(0.0, 1.0);
    }

    /// Construct a fresh engine directly from a saved blob.
    pub fn from_blob(blob: &str) -> Self {
        let mut engine = Self::new();
        engine.load(blob);
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_choice_returns_outcome() {
        let mut engine = NemesisEngine::with_seed(1);
        let outcome = engine.record_choice(
            "Alex",
            "I help the stranger",
            "The stranger survives",
            RoundContext { difficulty: 2, round: 1 },
        );
        assert!(engine.personality().trust > 50);
        assert_eq!(outcome.relationship, engine.relationships().category("alex"));
    }

    #[test]
    fn test_reset_for_new_game_keeps_memory() {
        let mut engine = NemesisEngine::with_seed(2);
        engine.record_choice("Alex", "I help", "", RoundContext::default());
        engine.reset_for_new_game();

        assert_eq!(engine.personality().trust, 50);
        assert_eq!(engine.personality().mood, Mood::Neutral);
        assert!(engine.memory("alex").is_some());
    }

    #[test]
    fn test_reset_relationship_forgets_one_player() {
        let mut engine = NemesisEngine::with_seed(3);
        engine.record_choice("Alex", "I help", "", RoundContext::default());
        engine.record_choice("Mara", "I help", "", RoundContext::default());

        engine.reset_relationship("Alex");
        assert!(engine.memory("alex").is_none());
        assert!(engine.memory("mara").is_some());
    }

    #[test]
    fn test_scalars_are_monotone() {
        let mut engine = NemesisEngine::with_seed(4);
        let mut last_adaptation = engine.adaptation_rate();
        let mut last_betrayal = engine.betrayal_probability();
        for round in 0..40 {
            engine.record_choice(
                "Alex",
                "I trust you and believe you",
                "They hurt me",
                RoundContext { difficulty: 3, round },
            );
            assert!(engine.adaptation_rate() >= last_adaptation);
            assert!(engine.betrayal_probability() >= last_betrayal);
            last_adaptation = engine.adaptation_rate();
            last_betrayal = engine.betrayal_probability();
        }
        assert!(engine.adaptation_rate() > BASE_ADAPTATION_RATE);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let run = || {
            let mut engine = NemesisEngine::with_seed(99);
            for round in 0..20 {
                engine.record_choice(
                    "Alex",
                    "I trust you with my secret",
                    "It hurts",
                    RoundContext { difficulty: 2, round },
                );
            }
            (
                engine.personality().trust,
                engine.personality().suspicion,
                engine.personality().chaotic_shifts,
                engine.relationships().category("alex"),
                engine.betrayal_plans().len(),
                engine.disorders().len(),
            )
        };
        assert_eq!(run(), run());
    }
}
