//! Token and cost estimation for the remote backend.
//!
//! Lexeme strings are short; ~1.2 tokens per whitespace word is close
//! enough for a pre-run cost confirmation in the calling layer.

use cognate_core::constants::{REMOTE_FREE_TIER_TOKENS, REMOTE_PRICE_PER_MILLION, TOKENS_PER_WORD};

/// A remote-backend cost estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub tokens: u64,
    pub cost_usd: f64,
    pub within_free_tier: bool,
}

/// Rough token count for a batch of short lexeme strings.
pub fn estimate_tokens(texts: &[String]) -> u64 {
    let total: f64 = texts
        .iter()
        .map(|t| (t.split_whitespace().count().max(1) as f64) * TOKENS_PER_WORD)
        .sum();
    (total as u64).max(1)
}

/// Cost for a token count. Zero within the free tier.
pub fn estimate_cost(tokens: u64) -> CostEstimate {
    if tokens <= REMOTE_FREE_TIER_TOKENS {
        return CostEstimate {
            tokens,
            cost_usd: 0.0,
            within_free_tier: true,
        };
    }
    let raw = tokens as f64 * REMOTE_PRICE_PER_MILLION / 1_000_000.0;
    CostEstimate {
        tokens,
        cost_usd: (raw * 10_000.0).round() / 10_000.0,
        within_free_tier: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_scale_with_words() {
        let one = estimate_tokens(&["word".to_string()]);
        let many = estimate_tokens(&["three word phrase".to_string()]);
        assert!(many > one);
        assert!(one >= 1);
    }

    #[test]
    fn empty_input_is_at_least_one_token() {
        assert_eq!(estimate_tokens(&[]), 1);
    }

    #[test]
    fn small_runs_are_free() {
        let estimate = estimate_cost(10_000);
        assert!(estimate.within_free_tier);
        assert_eq!(estimate.cost_usd, 0.0);
    }

    #[test]
    fn large_runs_are_priced() {
        let estimate = estimate_cost(10_000_000);
        assert!(!estimate.within_free_tier);
        assert!((estimate.cost_usd - 1.5).abs() < 1e-9);
    }
}
