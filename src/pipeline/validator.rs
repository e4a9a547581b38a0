use crate::config::ScriptRange;

/// Accepts tokens written entirely in the target script.
#[derive(Debug, Clone, Copy)]
pub struct TokenValidator {
    script: ScriptRange,
}

impl TokenValidator {
    pub fn new(script: ScriptRange) -> Self {
        Self { script }
    }

    /// True iff `token` is non-empty and every code point is inside the range.
    pub fn is_valid(&self, token: &str) -> bool {
        !token.is_empty() && token.chars().all(|c| self.script.contains(c))
    }

    /// Split on single spaces, drop invalid tokens, rejoin with single spaces.
    pub fn filter_tokens(&self, text: &str) -> String {
        text.split(' ')
            .filter(|token| self.is_valid(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
