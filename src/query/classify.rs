//! Lexical query classifier.
//!
//! Decides which entity level a chat query is about and whether it cannot
//! proceed without a selected patient. The rule table is static pattern
//! lists plus a patient id matcher and proper-name rules; patient signals
//! always win.
//!
//! Classification never fails. Text with no signal lands in provider scope
//! with low confidence.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Confidence reported when no rule matched.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;
const PATIENT_ID_CONFIDENCE: f64 = 0.95;
const PATIENT_PHRASE_CONFIDENCE: f64 = 0.7;
const AGGREGATE_CONFIDENCE: f64 = 0.6;
const PER_EXTRA_MATCH: f64 = 0.1;
const MAX_PHRASE_CONFIDENCE: f64 = 0.9;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Patient,
    #[default]
    Provider,
    Medspa,
}

impl Scope {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Provider => "provider",
            Self::Medspa => "medspa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub scope: Scope,
    pub requires_patient: bool,
    /// In `[0, 1]`.
    pub confidence: f64,
}

impl ClassificationResult {
    fn patient(confidence: f64) -> Self {
        Self { scope: Scope::Patient, requires_patient: true, confidence }
    }

    fn aggregate(scope: Scope, confidence: f64) -> Self {
        Self { scope, requires_patient: false, confidence }
    }

    /// Provider scope, no patient needed, low confidence.
    #[must_use]
    pub fn fallback() -> Self {
        Self::aggregate(Scope::Provider, FALLBACK_CONFIDENCE)
    }
}

// =============================================================================
// RULE TABLE
// =============================================================================

/// Record nouns that make a possessive refer to one patient's chart.
macro_rules! record_nouns {
    () => {
        r"(?:(?:last|next|previous|recent|upcoming|most\s+recent)\s+)?(?:chart|(?:treatment\s+|medical\s+)?history|records?|notes?|allergies|medications?|treatments?|treatment\s+plan|visits?|appointments?|sessions?|consult(?:ation)?s?|consent\s+forms?|photos?|vitals|labs?)\b"
    };
}

/// Capitalized words in a row, matched case-sensitively inside `(?i)` rules.
macro_rules! proper_name {
    () => {
        r"(?-i:([A-Z][a-z]+(?:[-’'][A-Z]?[a-z]+)?(?:\s+[A-Z][a-z]+(?:[-’'][A-Z]?[a-z]+)?)*))"
    };
}

/// `PT-1004`-style patient identifiers.
const PATIENT_ID_RULES: &[&str] = &[r"\bPT-\d{3,}\b"];

/// Phrasing that points at one specific patient record.
const PATIENT_RULES: &[&str] = &[
    r"\b(?:this|that|current|selected)\s+(?:patient|client)\b",
    concat!(r"\bthe\s+(?:patient|client)\s+", record_nouns!()),
    r"\b(?:patient|client)[’']s\b",
    r"\b(?:patient|client)\s+(?:named|called)\b",
    concat!(r"\b(?:her|his|their)\s+", record_nouns!()),
];

/// A proper name tied to a patient: `patient Jane Doe`, `Jane Doe's chart`.
/// Group 1 is the name; names made only of [`NON_NAME_WORDS`] are ignored.
const PATIENT_NAME_RULES: &[&str] = &[
    concat!(r"\b(?:patient|client)\s+", proper_name!(), r"\b"),
    concat!(r"\b", proper_name!(), r"[’']s\s+", record_nouns!()),
];

/// Capitalized words that start sentences or name things other than patients.
const NON_NAME_WORDS: &[&str] = &[
    "the", "this", "that", "my", "our", "your", "his", "her", "their", "i", "dr", "show", "pull", "get", "find",
    "summarize", "list", "open", "what", "when", "where", "who", "how", "today", "tomorrow", "yesterday", "monday",
    "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "clinic", "medspa", "spa", "practice",
    "portal", "intake", "form", "forms", "template", "templates", "count", "record", "records", "chart",
    "summary", "report", "dashboard", "schedule", "patient", "patients", "provider", "providers", "staff",
];

/// Phrasing about the signed-in provider's own work.
const PROVIDER_RULES: &[&str] = &[
    r"\bmy\s+(?:schedule|appointments?|calendar|bookings?|availability|day|week|patients|caseload)\b",
    r"\b(?:today|tomorrow)[’']?s\s+(?:schedule|appointments|bookings)\b",
    r"\bam\s+i\s+(?:booked|free|available)\b",
    r"\bwho\s+(?:am\s+i|do\s+i)\s+(?:seeing|see)\b",
];

/// Phrasing about the practice as a whole.
const MEDSPA_RULES: &[&str] = &[
    r"\ball\s+(?:patients|clients|providers|appointments)\b",
    r"\b(?:every|each)\s+provider\b",
    r"\brevenue\b",
    r"\bclinic\b",
    r"\bmed\s?spa\b",
    r"\binventory\b",
    r"\bstaff(?:ing)?\b",
    r"\b(?:daily|weekly|monthly|quarterly|yearly)\s+(?:sales|report|totals?|numbers)\b",
];

static PATIENT_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(PATIENT_ID_RULES));
static PATIENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(PATIENT_RULES));
static PATIENT_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(PATIENT_NAME_RULES));
static PROVIDER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(PROVIDER_RULES));
static MEDSPA_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(MEDSPA_RULES));

/// Compile a rule table case-insensitively. A rule that fails to compile is
/// logged and skipped; the table tests assert none are.
fn compile(rules: &[&str]) -> Vec<Regex> {
    rules
        .iter()
        .filter_map(|rule| match Regex::new(&format!("(?i){rule}")) {
            Ok(re) => Some(re),
            Err(e) => {
                error!(rule, error = %e, "classifier rule failed to compile");
                None
            }
        })
        .collect()
}

/// Number of name rules whose captured name is a plausible patient name.
fn name_matches(text: &str) -> usize {
    PATIENT_NAME_PATTERNS
        .iter()
        .filter(|re| {
            re.captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .any(|name| is_patient_name(name.as_str()))
        })
        .count()
}

/// A capture like `List Priya` still names a patient; `Show Today` does not.
fn is_patient_name(name: &str) -> bool {
    name.split_whitespace().any(|word| {
        let word = word.to_lowercase();
        !NON_NAME_WORDS.contains(&word.as_str())
    })
}

/// Patient ids mentioned in `text`, uppercased, in order of appearance.
#[must_use]
pub fn mentioned_patient_ids(text: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for re in PATIENT_ID_PATTERNS.iter() {
        for m in re.find_iter(text) {
            let id = m.as_str().to_uppercase();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

fn matches(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().filter(|re| re.is_match(text)).count()
}

/// `base`, raised per extra matching rule, capped.
#[allow(clippy::cast_precision_loss)]
fn phrase_confidence(base: f64, hits: usize) -> f64 {
    (base + PER_EXTRA_MATCH * hits.saturating_sub(1) as f64).min(MAX_PHRASE_CONFIDENCE)
}

// =============================================================================
// CLASSIFY
// =============================================================================

/// Classify `text` into a conversation scope.
///
/// Same text always yields the same result. `thread_id` is only used for
/// diagnostics.
#[must_use]
pub fn classify_query(text: &str, thread_id: Option<&str>) -> ClassificationResult {
    let result = classify_text(text);
    debug!(
        thread_id = thread_id.unwrap_or("-"),
        scope = result.scope.as_str(),
        requires_patient = result.requires_patient,
        confidence = result.confidence,
        "query classified"
    );
    result
}

fn classify_text(text: &str) -> ClassificationResult {
    if matches(&PATIENT_ID_PATTERNS, text) > 0 {
        return ClassificationResult::patient(PATIENT_ID_CONFIDENCE);
    }

    let patient = matches(&PATIENT_PATTERNS, text) + name_matches(text);
    if patient > 0 {
        return ClassificationResult::patient(phrase_confidence(PATIENT_PHRASE_CONFIDENCE, patient));
    }

    let provider = matches(&PROVIDER_PATTERNS, text);
    let medspa = matches(&MEDSPA_PATTERNS, text);
    match (provider, medspa) {
        (0, 0) => ClassificationResult::fallback(),
        (p, m) if m > p => ClassificationResult::aggregate(Scope::Medspa, phrase_confidence(AGGREGATE_CONFIDENCE, m)),
        (p, _) => ClassificationResult::aggregate(Scope::Provider, phrase_confidence(AGGREGATE_CONFIDENCE, p)),
    }
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
