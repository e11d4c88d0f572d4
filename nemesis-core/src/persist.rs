//! Engine persistence.
//!
//! The engine serializes to a versioned JSON blob. Loading is deliberately
//! lenient: each section of the blob is decoded independently, and a section
//! that fails validation falls back to its default instead of failing the
//! whole load. A half-corrupt save costs the player some history, never a
//! game. Crash-window semantics are the caller's concern: the engine is
//! expected to be saved at session boundaries, not after every mutation.

use crate::betrayal::BetrayalPlanner;
use crate::disorders::DisorderAccumulator;
use crate::memory::PlayerMemoryStore;
use crate::personality::PersonalityState;
use crate::relationship::RelationshipGraph;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Current save blob version.
pub const SAVE_VERSION: u32 = 1;

/// Errors from the file-level persistence helpers.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The whole-engine save blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEngine {
    pub version: u32,
    /// Version of the keyword taxonomy the engine ran under when saved.
    pub signal_table_version: u32,
    pub saved_at: u64,
    pub personality: PersonalityState,
    pub memory: PlayerMemoryStore,
    pub relationships: RelationshipGraph,
    pub disorders: DisorderAccumulator,
    pub plans: BetrayalPlanner,
    pub adaptation_rate: f64,
    pub betrayal_probability: f64,
}

impl Default for SavedEngine {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            signal_table_version: crate::signals::SIGNAL_TABLE_VERSION,
            saved_at: 0,
            personality: PersonalityState::default(),
            memory: PlayerMemoryStore::default(),
            relationships: RelationshipGraph::default(),
            disorders: DisorderAccumulator::default(),
            plans: BetrayalPlanner::default(),
            adaptation_rate: 0.1,
            betrayal_probability: 0.1,
        }
    }
}

impl SavedEngine {
    /// Serialize to a pretty JSON blob.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Decode a blob, section by section.
    ///
    /// Sections that fail to decode are replaced with their defaults; a blob
    /// that is not JSON at all decodes to the full default. Numeric
    /// invariants are re-established afterwards, so even a tampered blob
    /// yields a state the engine can run on.
    pub fn from_json(blob: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(blob) else {
            return Self::default();
        };

        let defaults = Self::default();
        let mut saved = Self {
            version: section_or(&value, "version", defaults.version),
            signal_table_version: section_or(
                &value,
                "signal_table_version",
                defaults.signal_table_version,
            ),
            saved_at: section_or(&value, "saved_at", defaults.saved_at),
            personality: section_or(&value, "personality", defaults.personality),
            memory: section_or(&value, "memory", defaults.memory),
            relationships: section_or(&value, "relationships", defaults.relationships),
            disorders: section_or(&value, "disorders", defaults.disorders),
            plans: section_or(&value, "plans", defaults.plans),
            adaptation_rate: section_or(&value, "adaptation_rate", defaults.adaptation_rate),
            betrayal_probability: section_or(
                &value,
                "betrayal_probability",
                defaults.betrayal_probability,
            ),
        };
        saved.normalize();
        saved
    }

    /// Clamp every section back inside its invariants.
    fn normalize(&mut self) {
        self.personality.normalize();
        self.memory.normalize();
        self.disorders.normalize();
        self.adaptation_rate = self.adaptation_rate.clamp(0.0, 1.0);
        self.betrayal_probability = self.betrayal_probability.clamp(0.0, 1.0);
    }

    /// Write the blob to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        fs::write(path, self.to_json()).await?;
        Ok(())
    }

    /// Read a blob from a JSON file (lenient, like [`SavedEngine::from_json`]).
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        Ok(Self::from_json(&content))
    }
}

/// Decode one top-level section, falling back to the given default.
fn section_or<T: DeserializeOwned>(value: &Value, key: &str, default: T) -> T {
    value
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or(default)
}
