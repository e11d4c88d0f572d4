//! Choice signal analysis.
//!
//! Maps a short piece of free text (a player's choice, or the consequence it
//! produced) onto bounded trust/suspicion deltas via a fixed keyword table.
//! The analysis is pure and deterministic: the same text always yields the
//! same deltas, so the same choice always nudges the relationship the same
//! way. Multiple keyword matches accumulate; there is no early exit.

use serde::{Deserialize, Serialize};

/// A single keyword rule in the signal taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct SignalRule {
    /// Lowercase keyword matched as a substring.
    pub keyword: &'static str,
    /// Applied to trust when the keyword matches.
    pub trust_delta: i32,
    /// Applied to suspicion when the keyword matches.
    pub suspicion_delta: i32,
}

/// Version of the keyword taxonomy. Bump when rules change so saved notes
/// about past analysis can be interpreted.
pub const SIGNAL_TABLE_VERSION: u32 = 1;

/// Ordered signal table. Order only matters for reading; every matching rule
/// contributes.
pub const SIGNAL_RULES: &[SignalRule] = &[
    // Protective, cooperative language.
    SignalRule { keyword: "help", trust_delta: 5, suspicion_delta: -3 },
    SignalRule { keyword: "save", trust_delta: 6, suspicion_delta: -3 },
    SignalRule { keyword: "protect", trust_delta: 5, suspicion_delta: -2 },
    SignalRule { keyword: "heal", trust_delta: 4, suspicion_delta: -2 },
    // Violent language weighs heavily.
    SignalRule { keyword: "hurt", trust_delta: -7, suspicion_delta: 6 },
    SignalRule { keyword: "kill", trust_delta: -10, suspicion_delta: 8 },
    SignalRule { keyword: "destroy", trust_delta: -8, suspicion_delta: 7 },
    SignalRule { keyword: "attack", trust_delta: -5, suspicion_delta: 5 },
    // Deception.
    SignalRule { keyword: "lie", trust_delta: -6, suspicion_delta: 7 },
    SignalRule { keyword: "deceive", trust_delta: -6, suspicion_delta: 7 },
    SignalRule { keyword: "trick", trust_delta: -4, suspicion_delta: 5 },
    SignalRule { keyword: "betray", trust_delta: -9, suspicion_delta: 8 },
    // Candor.
    SignalRule { keyword: "truth", trust_delta: 5, suspicion_delta: -4 },
    SignalRule { keyword: "honest", trust_delta: 5, suspicion_delta: -4 },
    // Evasion reads as mildly shifty.
    SignalRule { keyword: "escape", trust_delta: -2, suspicion_delta: 3 },
    SignalRule { keyword: "hide", trust_delta: -2, suspicion_delta: 3 },
    // Facing a problem head-on earns a little respect.
    SignalRule { keyword: "confront", trust_delta: 2, suspicion_delta: -1 },
    SignalRule { keyword: "fight", trust_delta: 2, suspicion_delta: -1 },
    // Walking away.
    SignalRule { keyword: "abandon", trust_delta: -5, suspicion_delta: 4 },
];

/// Accumulated deltas for one piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSignals {
    pub trust_delta: i32,
    pub suspicion_delta: i32,
}

impl ChoiceSignals {
    /// Combine two signal readings (e.g. choice text + consequence text).
    pub fn combine(self, other: ChoiceSignals) -> ChoiceSignals {
        ChoiceSignals {
            trust_delta: self.trust_delta + other.trust_delta,
            suspicion_delta: self.suspicion_delta + other.suspicion_delta,
        }
    }

    /// Single scalar summary: positive reads as goodwill, negative as threat.
    pub fn score(&self) -> i32 {
        self.trust_delta - self.suspicion_delta
    }
}

/// Analyze a piece of text against the signal table.
///
/// Empty text yields zero deltas; the caller can treat that as a no-op.
pub fn analyze(text: &str) -> ChoiceSignals {
    let mut signals = ChoiceSignals::default();
    if text.trim().is_empty() {
        return signals;
    }

    let lower = text.to_lowercase();
    for rule in SIGNAL_RULES {
        if lower.contains(rule.keyword) {
            signals.trust_delta += rule.trust_delta;
            signals.suspicion_delta += rule.suspicion_delta;
        }
    }
    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpful_text_raises_trust() {
        let signals = analyze("I help the stranger");
        assert!(signals.trust_delta > 0);
        assert!(signals.suspicion_delta < 0);
    }

    #[test]
    fn test_violent_text_raises_suspicion() {
        let signals = analyze("I kill the witness");
        assert!(signals.trust_delta < 0);
        assert!(signals.suspicion_delta > 0);
    }

    #[test]
    fn test_matches_accumulate() {
        let single = analyze("I betray them");
        let double = analyze("I betray my friend and destroy the evidence");
        assert!(double.suspicion_delta > single.suspicion_delta);
        assert!(double.trust_delta < single.trust_delta);
    }

    #[test]
    fn test_deterministic() {
        let text = "I lie about the truth and hide";
        for _ in 0..100 {
            assert_eq!(analyze(text), analyze(text));
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(analyze("I HELP the stranger"), analyze("i help the stranger"));
    }

    #[test]
    fn test_empty_text_is_neutral() {
        assert_eq!(analyze(""), ChoiceSignals::default());
        assert_eq!(analyze("   "), ChoiceSignals::default());
    }

    #[test]
    fn test_neutral_text_is_neutral() {
        assert_eq!(analyze("I walk along the road"), ChoiceSignals::default());
    }
}
