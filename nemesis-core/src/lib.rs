//! Adaptive antagonist engine for choice-driven narrative games.
//!
//! This crate models "how the antagonist feels about this player": an
//! evolving personality that reacts to every forced choice, remembers
//! players across sessions, classifies its relationship with each of them,
//! accumulates its own disorders, schedules betrayals, and calls out
//! suspected lies in claimed identities. The engine produces structured
//! state; phrasing it into prose is the caller's job.
//!
//! # Quick Start
//!
//! ```
//! use nemesis_core::{NemesisEngine, RoundContext};
//!
//! let mut engine = NemesisEngine::with_seed(7);
//! let outcome = engine.record_choice(
//!     "Alex",
//!     "I help the stranger",
//!     "The stranger survives",
//!     RoundContext { difficulty: 2, round: 1 },
//! );
//! println!("mood: {}", outcome.mood);
//!
//! let blob = engine.serialize();
//! engine.load(&blob);
//! ```

pub mod betrayal;
pub mod disorders;
pub mod engine;
pub mod fears;
pub mod lies;
pub mod memory;
pub mod persist;
pub mod personality;
pub mod relationship;
pub mod signals;

// Primary public API
pub use betrayal::{BetrayalKind, BetrayalPlan, BetrayalPlanner, PlanId};
pub use disorders::{DisorderAccumulator, DisorderRecord, DisorderTrait};
pub use engine::{NemesisEngine, RoundContext, RoundOutcome};
pub use fears::FearCategory;
pub use lies::{IdentityClaim, LieKind, LieRecord, LieSeverity};
pub use memory::{PlayerMemory, PlayerMemoryStore};
pub use persist::{PersistError, SavedEngine};
pub use personality::{Mood, PersonalityState};
pub use relationship::{RelationshipCategory, RelationshipGraph};

/// Current UNIX timestamp in whole seconds.
pub(crate) fn now_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
