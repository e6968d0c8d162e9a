//! Keyword-based intent classification
//!
//! Every predicate is evaluated independently over normalized text. The
//! transition table decides which predicate wins in a given step.

use super::normalize::normalize;

const RESET_KEYWORDS: &[&str] = &["reiniciar", "reset"];

const AFFIRM_KEYWORDS: &[&str] = &[
    "si",
    "sí",
    "simon",
    "simón",
    "va",
    "dale",
    "ok",
    "yes",
    "jalo",
    "arre",
    "claro",
    "sale",
    "por supuesto",
];

const DENY_KEYWORDS: &[&str] = &["no", "nel", "nelson", "nop", "nope", "nono", "para nada"];

const SELF_REFERENCE_KEYWORDS: &[&str] = &[
    "yo",
    "mi",
    "para mi",
    "para mí",
    "mi mismo",
    "yo mismo",
    "mismito",
    "a mi",
];

const GREETING_EXACT: &[&str] = &["hola"];
const GREETING_CONTAINS: &[&str] = &["buenas", "hey"];

/// Coarse classification of one inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Affirm,
    Deny,
    SelfReference,
    Reset,
    Greeting,
    Other,
}

/// Result of every predicate for one message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)] // one flag per independent predicate
pub struct IntentFlags {
    pub reset: bool,
    pub affirm: bool,
    pub deny: bool,
    pub self_reference: bool,
    pub greeting: bool,
}

impl IntentFlags {
    /// True when no predicate matched
    pub fn is_other(&self) -> bool {
        !(self.reset || self.affirm || self.deny || self.self_reference || self.greeting)
    }

    /// Single intent for logging, in global override order
    pub fn primary(&self) -> Intent {
        if self.is_other() {
            Intent::Other
        } else if self.reset {
            Intent::Reset
        } else if self.greeting {
            Intent::Greeting
        } else if self.affirm {
            Intent::Affirm
        } else if self.deny {
            Intent::Deny
        } else {
            Intent::SelfReference
        }
    }
}

/// Pluggable classifier over normalized text
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, normalized: &str) -> IntentFlags;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    /// Keyword appears anywhere in the text
    Contains,
    /// Text, stripped of surrounding punctuation, equals the keyword
    Exact,
    /// Text equals the keyword or ends with it on a word boundary
    Trailing,
}

#[derive(Debug, Clone)]
struct KeywordSet {
    keywords: Vec<String>,
    mode: MatchMode,
}

impl KeywordSet {
    fn new(keywords: &[&str], mode: MatchMode) -> Self {
        let mut keywords: Vec<String> = keywords.iter().map(|k| normalize(k)).collect();
        keywords.sort();
        keywords.dedup();
        Self { keywords, mode }
    }

    fn matches(&self, text: &str) -> bool {
        let bare = strip_punctuation(text);
        self.keywords.iter().any(|kw| match self.mode {
            MatchMode::Contains => text.contains(kw.as_str()),
            MatchMode::Exact => bare == kw,
            MatchMode::Trailing => {
                bare == kw
                    || bare
                        .strip_suffix(kw.as_str())
                        .is_some_and(|head| head.ends_with(char::is_whitespace))
            }
        })
    }
}

fn strip_punctuation(text: &str) -> &str {
    text.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Substring classifier over fixed Spanish/English keyword sets.
///
/// Self-reference uses trailing-phrase matching so "es para mí" matches while
/// "mi papá" does not.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    reset: KeywordSet,
    affirm: KeywordSet,
    deny: KeywordSet,
    self_reference: KeywordSet,
    greeting_exact: KeywordSet,
    greeting_contains: KeywordSet,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            reset: KeywordSet::new(RESET_KEYWORDS, MatchMode::Contains),
            affirm: KeywordSet::new(AFFIRM_KEYWORDS, MatchMode::Contains),
            deny: KeywordSet::new(DENY_KEYWORDS, MatchMode::Contains),
            self_reference: KeywordSet::new(SELF_REFERENCE_KEYWORDS, MatchMode::Trailing),
            greeting_exact: KeywordSet::new(GREETING_EXACT, MatchMode::Exact),
            greeting_contains: KeywordSet::new(GREETING_CONTAINS, MatchMode::Contains),
        }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, normalized: &str) -> IntentFlags {
        if normalized.is_empty() {
            return IntentFlags::default();
        }
        IntentFlags {
            reset: self.reset.matches(normalized),
            affirm: self.affirm.matches(normalized),
            deny: self.deny.matches(normalized),
            self_reference: self.self_reference.matches(normalized),
            greeting: self.greeting_exact.matches(normalized)
                || self.greeting_contains.matches(normalized),
        }
    }
}
