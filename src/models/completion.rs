//! Model completion results and token accounting.

use serde::{Deserialize, Serialize};

use crate::models::Content;

/// Token counts reported by a provider for one completion.
///
/// Providers differ in what they report, so every field is optional. Use
/// [`absorb`](TokenUsage::absorb) to accumulate usage across the turns of an
/// agent run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    input: Option<u32>,
    output: Option<u32>,
    total: Option<u32>,
}

impl TokenUsage {
    /// Usage with no reported counts.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            input: None,
            output: None,
            total: None,
        }
    }

    /// Usage from whatever counts the provider reported.
    #[must_use]
    pub const fn partial(input: Option<u32>, output: Option<u32>, total: Option<u32>) -> Self {
        Self {
            input,
            output,
            total,
        }
    }

    #[must_use]
    pub fn input_tokens(&self) -> u32 {
        self.input.unwrap_or(0)
    }

    #[must_use]
    pub fn output_tokens(&self) -> u32 {
        self.output.unwrap_or(0)
    }

    #[must_use]
    pub fn total_tokens(&self) -> u32 {
        self.total.unwrap_or(0)
    }

    /// True when no counts were reported at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none() && self.total.is_none()
    }

    /// Adds another usage record into this one.
    ///
    /// A count stays `None` only when neither side reported it, so a provider
    /// that omits totals on some turns does not erase the turns that had them.
    pub fn absorb(&mut self, other: &Self) {
        self.input = sum_opt(self.input, other.input);
        self.output = sum_opt(self.output, other.output);
        self.total = sum_opt(self.total, other.total);
    }
}

fn sum_opt(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (None, None) => None,
        _ => Some(a.unwrap_or(0).saturating_add(b.unwrap_or(0))),
    }
}

/// One completion from a model: the assistant content plus token usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    content: Content,
    usage: TokenUsage,
}

impl Completion {
    #[must_use]
    pub const fn new(content: Content, usage: TokenUsage) -> Self {
        Self { content, usage }
    }

    #[must_use]
    pub const fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn into_content(self) -> Content {
        self.content
    }

    #[must_use]
    pub const fn usage(&self) -> &TokenUsage {
        &self.usage
    }

    #[must_use]
    pub fn into_parts(self) -> (Content, TokenUsage) {
        (self.content, self.usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_sums_reported_counts() {
        let mut usage = TokenUsage::partial(Some(10), Some(5), Some(15));
        usage.absorb(&TokenUsage::partial(Some(20), Some(3), Some(23)));

        assert_eq!(usage.input_tokens(), 30);
        assert_eq!(usage.output_tokens(), 8);
        assert_eq!(usage.total_tokens(), 38);
    }

    #[test]
    fn absorb_keeps_none_only_when_both_missing() {
        let mut usage = TokenUsage::partial(Some(10), None, None);
        usage.absorb(&TokenUsage::partial(None, Some(4), None));

        assert_eq!(usage, TokenUsage::partial(Some(10), Some(4), None));

        let mut empty = TokenUsage::empty();
        empty.absorb(&TokenUsage::empty());
        assert!(empty.is_empty());
    }
}
