//! Typographic character replacement.
//!
//! Some consoles mangle macronized vowels and curly punctuation, both of
//! which the mentors produce often ("Dokkōdō", "—"). Every successful reply
//! goes through [`sanitize`] before it leaves the pipeline.
//!
//! All replacements are plain ASCII, so applying the table twice changes
//! nothing the first pass did not.

/// Built-in replacements, applied in order.
pub const DEFAULT_REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{014D}", "o"),   // ō
    ("\u{016B}", "u"),   // ū
    ("\u{0101}", "a"),   // ā
    ("\u{012B}", "i"),   // ī
    ("\u{0113}", "e"),   // ē
    ("\u{2014}", "-"),   // em dash
    ("\u{2018}", "'"),   // left single quote
    ("\u{2019}", "'"),   // right single quote
    ("\u{201C}", "\""),  // left double quote
    ("\u{201D}", "\""),  // right double quote
    ("\u{2026}", "..."), // ellipsis
];

/// Replace the built-in set of characters.
pub fn sanitize(text: &str) -> String {
    DEFAULT_REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// An extendable replacement table.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    replacements: Vec<(String, String)>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            replacements: DEFAULT_REPLACEMENTS
                .iter()
                .map(|(f, t)| (f.to_string(), t.to_string()))
                .collect(),
        }
    }
}

impl Sanitizer {
    /// Append a replacement.
    ///
    /// Keep `to` free of anything the table itself replaces, or the
    /// idempotence guarantee no longer holds.
    pub fn with_replacement(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        if !from.is_empty() {
            self.replacements.push((from, to.into()));
        }
        self
    }

    pub fn apply(&self, text: &str) -> String {
        self.replacements
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }
}
