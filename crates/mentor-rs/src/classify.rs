//! Greeting / farewell / question detection.
//!
//! Matching is case-insensitive *substring* search, not word matching:
//! `"this"` contains `"hi"` and therefore reads as a greeting. Farewell
//! keywords are checked before greeting keywords, so `"hi, goodbye"` is a
//! farewell. Both behaviors are relied on; do not tighten them.

use serde::Serialize;

/// Farewell keywords, checked first.
pub const FAREWELL_KEYWORDS: &[&str] = &[
    "bye",
    "goodbye",
    "farewell",
    "see you",
    "until next time",
    "thank you for your wisdom",
    "i must go",
    "i have to leave",
];

/// Greeting keywords, checked after farewells.
pub const GREETING_KEYWORDS: &[&str] = &[
    "hello",
    "hi",
    "greetings",
    "good morning",
    "good evening",
    "hey",
    "howdy",
    "salutations",
];

/// What kind of turn the latest user message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationType {
    Greeting,
    Farewell,
    Question,
}

impl std::fmt::Display for ConversationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationType::Greeting => write!(f, "greeting"),
            ConversationType::Farewell => write!(f, "farewell"),
            ConversationType::Question => write!(f, "question"),
        }
    }
}

/// Keyword classifier. [`Classifier::default`] uses the built-in lists;
/// the lists can be extended for new phrasings.
#[derive(Debug, Clone)]
pub struct Classifier {
    farewell: Vec<String>,
    greeting: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            farewell: FAREWELL_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            greeting: GREETING_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl Classifier {
    /// Append a farewell keyword (stored lower-cased).
    pub fn with_farewell(mut self, keyword: impl Into<String>) -> Self {
        self.farewell.push(keyword.into().to_lowercase());
        self
    }

    /// Append a greeting keyword (stored lower-cased).
    pub fn with_greeting(mut self, keyword: impl Into<String>) -> Self {
        self.greeting.push(keyword.into().to_lowercase());
        self
    }

    /// Label `message`. First matching list wins; no match is a question.
    pub fn classify(&self, message: &str) -> ConversationType {
        let lower = message.to_lowercase();
        let lower = lower.trim();

        if self.farewell.iter().any(|k| lower.contains(k.as_str())) {
            ConversationType::Farewell
        } else if self.greeting.iter().any(|k| lower.contains(k.as_str())) {
            ConversationType::Greeting
        } else {
            ConversationType::Question
        }
    }
}

/// Classify with the built-in keyword lists.
pub fn classify(message: &str) -> ConversationType {
    let lower = message.to_lowercase();
    let lower = lower.trim();

    if FAREWELL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ConversationType::Farewell
    } else if GREETING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ConversationType::Greeting
    } else {
        ConversationType::Question
    }
}
