//! Query normalization and input validation
//!
//! Queries are trimmed and lower-cased before anything else looks at them.
//! Input that is empty, or that matches the suspicious-pattern table, is
//! rejected with a user-facing message before any outbound lookup.
//!
//! The pattern table is data. Most rules pair an implausible keyword with a
//! qualifying word ("unicorn meat", "rock hard") so whimsical but real foods
//! such as "dragon fruit" still pass. A short list of standalone terms is
//! rejected on its own.
//!
//! # Example
//!
//! ```rust
//! use moodfood_core::validation::InputValidator;
//!
//! let validator = InputValidator::new();
//! assert!(validator.validate("dragon fruit").is_accepted());
//! assert!(!validator.validate("unicorn meat").is_accepted());
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Shown when the query is empty, whitespace or not text at all
pub const EMPTY_INPUT_MESSAGE: &str = "Please provide a valid food name to search for.";

/// A keyword that is only suspicious when followed by one of its qualifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRule {
    /// Implausible-food keyword
    pub keyword: &'static str,
    /// Words that turn the keyword into a non-food query
    pub qualifiers: &'static [&'static str],
}

/// Keyword + qualifier combinations that mark a query as non-food
pub const COMBINATION_RULES: &[PatternRule] = &[
    // Mythical creatures + body parts
    PatternRule { keyword: "unicorn", qualifiers: &["food", "meat", "flesh"] },
    PatternRule { keyword: "gargoyle", qualifiers: &["claws", "wings", "scales"] },
    PatternRule { keyword: "dragon", qualifiers: &["claws", "wings", "scales", "blood"] },
    PatternRule { keyword: "fairy", qualifiers: &["dust", "wings", "magic"] },
    // Non-food materials in isolation
    PatternRule { keyword: "blood", qualifiers: &["alone", "drink"] },
    PatternRule { keyword: "flesh", qualifiers: &["alone", "raw"] },
    PatternRule { keyword: "rock", qualifiers: &["alone", "hard"] },
    PatternRule { keyword: "stone", qualifiers: &["alone", "hard"] },
    PatternRule { keyword: "metal", qualifiers: &["alone", "hard"] },
    PatternRule { keyword: "plastic", qualifiers: &["alone", "hard"] },
    PatternRule { keyword: "glass", qualifiers: &["alone", "hard"] },
    PatternRule { keyword: "wood", qualifiers: &["alone", "hard"] },
];

/// Terms rejected wherever they appear as a whole word
pub const STANDALONE_TERMS: &[&str] = &["earwax", "hooves", "poop", "poo", "pee", "urine"];

static DEFAULT_PATTERNS: Lazy<Arc<[SuspiciousPattern]>> = Lazy::new(|| {
    compile_patterns(COMBINATION_RULES, STANDALONE_TERMS)
        .expect("built-in suspicious patterns are valid regexes")
        .into()
});

/// Trim and lower-case a raw query
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A query as typed plus its normalized form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    normalized: String,
}

impl Query {
    /// Build a query, normalizing the raw text
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(&raw);
        Self { raw, normalized }
    }

    /// The text exactly as the caller gave it
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed, lower-cased form used for lookup and scoring
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Why a query was rejected (for logs, not for users)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Empty or whitespace-only text
    Empty,
    /// The input was not a string; reported as empty input
    NotText,
    /// Matched an entry of the suspicious-pattern table
    Suspicious {
        /// Label of the matching pattern
        pattern: String,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty | Self::NotText => write!(f, "empty input"),
            Self::Suspicious { pattern } => write!(f, "suspicious pattern: {pattern}"),
        }
    }
}

/// A rejected query: internal reason plus the message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    reason: RejectReason,
    message: String,
}

impl Rejection {
    fn empty(reason: RejectReason) -> Self {
        Self {
            reason,
            message: EMPTY_INPUT_MESSAGE.to_string(),
        }
    }

    fn suspicious(raw: &str, pattern: &str) -> Self {
        Self {
            reason: RejectReason::Suspicious {
                pattern: pattern.to_string(),
            },
            message: format!(
                "Sorry, \"{raw}\" doesn't appear to be a real food. Please try asking about actual foods like \"banana\", \"apple\", \"chicken\", \"rice\", etc."
            ),
        }
    }

    /// Internal diagnostic
    #[must_use]
    pub fn reason(&self) -> &RejectReason {
        &self.reason
    }

    /// User-facing explanation
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of validating a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Query is well-formed and plausibly a food
    Accepted(Query),
    /// Query was refused
    Rejected(Rejection),
}

impl ValidationResult {
    /// Check if validation passed
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Normalized query, if accepted
    #[must_use]
    pub fn normalized(&self) -> Option<&str> {
        match self {
            Self::Accepted(query) => Some(query.normalized()),
            Self::Rejected(_) => None,
        }
    }
}

/// A compiled entry of the pattern table
#[derive(Debug, Clone)]
pub struct SuspiciousPattern {
    label: String,
    regex: Regex,
}

impl SuspiciousPattern {
    /// Human-readable label, e.g. `unicorn food|meat|flesh`
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Compile a pattern table into case-insensitive whole-word regexes
pub fn compile_patterns(
    rules: &[PatternRule],
    standalone: &[&str],
) -> Result<Vec<SuspiciousPattern>, regex::Error> {
    let mut patterns = Vec::with_capacity(rules.len() + standalone.len());

    for rule in rules {
        let qualifiers: Vec<String> = rule.qualifiers.iter().map(|q| regex::escape(q)).collect();
        let regex = Regex::new(&format!(
            r"(?i)\b{}\s+(?:{})\b",
            regex::escape(rule.keyword),
            qualifiers.join("|")
        ))?;
        patterns.push(SuspiciousPattern {
            label: format!("{} {}", rule.keyword, rule.qualifiers.join("|")),
            regex,
        });
    }

    for term in standalone {
        patterns.push(SuspiciousPattern {
            label: (*term).to_string(),
            regex: Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term)))?,
        });
    }

    Ok(patterns)
}

/// Validates raw food queries against the suspicious-pattern table
#[derive(Debug, Clone)]
pub struct InputValidator {
    patterns: Arc<[SuspiciousPattern]>,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl InputValidator {
    /// Validator using the built-in pattern table
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: Arc::clone(&*DEFAULT_PATTERNS),
        }
    }

    /// Validator using a custom pattern table
    pub fn with_rules(rules: &[PatternRule], standalone: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self {
            patterns: compile_patterns(rules, standalone)?.into(),
        })
    }

    /// Compiled patterns in evaluation order
    #[must_use]
    pub fn patterns(&self) -> &[SuspiciousPattern] {
        &self.patterns
    }

    /// Validate and normalize a raw query
    #[must_use]
    pub fn validate(&self, raw: &str) -> ValidationResult {
        let query = Query::new(raw);
        if query.normalized().is_empty() {
            return ValidationResult::Rejected(Rejection::empty(RejectReason::Empty));
        }

        if let Some(pattern) = self.patterns.iter().find(|p| p.is_match(query.normalized())) {
            return ValidationResult::Rejected(Rejection::suspicious(raw, pattern.label()));
        }

        ValidationResult::Accepted(query)
    }

    /// Validate a JSON tool argument, rejecting anything that is not a string
    #[must_use]
    pub fn validate_value(&self, value: &serde_json::Value) -> ValidationResult {
        match value.as_str() {
            Some(raw) => self.validate(raw),
            None => ValidationResult::Rejected(Rejection::empty(RejectReason::NotText)),
        }
    }
}
