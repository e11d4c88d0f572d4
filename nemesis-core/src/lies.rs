//! Lie detection over claimed identity data.
//!
//! A stateless, best-effort heuristic: pattern rules over the claimed name,
//! a range rule over the claimed age, and a consistency pass over previous
//! claims. This is narrative flavor, not verification — the antagonist uses
//! the records to confront the player, nothing is ever actually validated.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What kind of falsehood a record flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LieKind {
    FakeName,
    VulgarName,
    JokeName,
    SuspiciousAge,
    NameChange,
    AgeChange,
    LocationChange,
}

impl LieKind {
    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            LieKind::FakeName => "fake_name",
            LieKind::VulgarName => "vulgar",
            LieKind::JokeName => "joke_name",
            LieKind::SuspiciousAge => "suspicious_age",
            LieKind::NameChange => "name_change",
            LieKind::AgeChange => "age_change",
            LieKind::LocationChange => "location_change",
        }
    }
}

/// How hard the antagonist should lean on this in a confrontation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LieSeverity {
    Low,
    Medium,
    High,
}

/// One suspected falsehood. Produced fresh each pass, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LieRecord {
    pub kind: LieKind,
    pub claimed_value: String,
    pub reason: String,
    pub severity: LieSeverity,
}

/// Identity fields a player may claim. All optional; absent fields are
/// simply not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub name: Option<String>,
    pub age: Option<String>,
    pub location: Option<String>,
}

struct NameRule {
    pattern: Regex,
    kind: LieKind,
    severity: LieSeverity,
    reason: &'static str,
}

lazy_static! {
    /// Ordered name rules; the first match wins.
    static ref NAME_RULES: Vec<NameRule> = vec![
        NameRule {
            pattern: Regex::new(
                r"(?i)^(?:asdf\w*|test\d*|admin|user\d*|player\d*|name|username|unknown|anonymous|nobody|none|n/?a)$",
            )
            .expect("placeholder pattern"),
            kind: LieKind::FakeName,
            severity: LieSeverity::High,
            reason: "placeholder name",
        },
        NameRule {
            pattern: Regex::new(r"(?i)^[a-z]{1,2}$").expect("short-name pattern"),
            kind: LieKind::FakeName,
            severity: LieSeverity::Medium,
            reason: "too short to be a name",
        },
        NameRule {
            pattern: Regex::new(r"(?i)(?:qwert|zxcv|hjkl|qazwsx|asdf|aaa|sss|xxx|zzz)")
                .expect("keyboard pattern"),
            kind: LieKind::FakeName,
            severity: LieSeverity::High,
            reason: "keyboard mash",
        },
        NameRule {
            pattern: Regex::new(r"(?i)(?:fuck|shit|bitch|cunt|dick|asshole)")
                .expect("profanity pattern"),
            kind: LieKind::VulgarName,
            severity: LieSeverity::High,
            reason: "contains profanity",
        },
        NameRule {
            pattern: Regex::new(r"(?i)(?:lol|lmao|haha|poop|noob|meme|joke|\bxd\b)")
                .expect("joke pattern"),
            kind: LieKind::JokeName,
            severity: LieSeverity::Medium,
            reason: "joke name",
        },
        NameRule {
            pattern: Regex::new(r"\d{3,}").expect("digit pattern"),
            kind: LieKind::FakeName,
            severity: LieSeverity::Medium,
            reason: "too many digits",
        },
        NameRule {
            pattern: Regex::new(r"[^A-Za-z0-9\s'\-]{2,}").expect("symbol pattern"),
            kind: LieKind::FakeName,
            severity: LieSeverity::Medium,
            reason: "symbol run",
        },
        NameRule {
            pattern: Regex::new(r"(?:[a-z][A-Z]){3,}").expect("alternating-case pattern"),
            kind: LieKind::FakeName,
            severity: LieSeverity::Low,
            reason: "alternating case",
        },
    ];
}

/// Run every check against a claimed identity.
///
/// Output order is fixed: name rules, then the age rule, then the
/// cross-history consistency checks. No record is emitted when nothing fires.
pub fn detect(claimed: &IdentityClaim, response_history: &[IdentityClaim]) -> Vec<LieRecord> {
    let mut records = Vec::new();

    if let Some(name) = claimed.name.as_deref() {
        if let Some(record) = check_name(name) {
            records.push(record);
        }
    }

    if let Some(age) = claimed.age.as_deref() {
        if let Some(record) = check_age(age) {
            records.push(record);
        }
    }

    records.extend(check_consistency(response_history));
    records
}

/// First matching name rule, if any.
fn check_name(name: &str) -> Option<LieRecord> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    NAME_RULES
        .iter()
        .find(|rule| rule.pattern.is_match(trimmed))
        .map(|rule| LieRecord {
            kind: rule.kind,
            claimed_value: trimmed.to_string(),
            reason: rule.reason.to_string(),
            severity: rule.severity,
        })
}

/// Range rule over the claimed age. Malformed input is itself suspicious;
/// it never raises an error.
fn check_age(age: &str) -> Option<LieRecord> {
    let trimmed = age.trim();
    if trimmed.is_empty() {
        return None;
    }

    let reason = match trimmed.parse::<f64>() {
        Err(_) => "not a number",
        Ok(value) if value.is_nan() => "not a number",
        Ok(value) if value == 0.0 => "claims to be zero years old",
        Ok(value) if !(13.0..=120.0).contains(&value) => "outside plausible range",
        Ok(_) => return None,
    };

    Some(LieRecord {
        kind: LieKind::SuspiciousAge,
        claimed_value: trimmed.to_string(),
        reason: reason.to_string(),
        severity: LieSeverity::Medium,
    })
}

/// One record per identity field whose claimed value changed across history.
fn check_consistency(history: &[IdentityClaim]) -> Vec<LieRecord> {
    let mut records = Vec::new();

    let fields: [(LieKind, LieSeverity, fn(&IdentityClaim) -> Option<&String>); 3] = [
        (LieKind::NameChange, LieSeverity::High, |c| c.name.as_ref()),
        (LieKind::AgeChange, LieSeverity::Medium, |c| c.age.as_ref()),
        (
            LieKind::LocationChange,
            LieSeverity::Medium,
            |c| c.location.as_ref(),
        ),
    ];

    for (kind, severity, get) in fields {
        let mut seen: Vec<String> = Vec::new();
        for claim in history {
            if let Some(value) = get(claim) {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if !seen.iter().any(|s| s.eq_ignore_ascii_case(trimmed)) {
                    seen.push(trimmed.to_string());
                }
            }
        }

        if seen.len() > 1 {
            records.push(LieRecord {
                kind,
                claimed_value: seen.last().cloned().unwrap_or_default(),
                reason: format!("claimed values: {}", seen.join(", ")),
                severity,
            });
        }
    }

    records
}
