//! Token usage.

use serde::{Deserialize, Serialize};

use crate::engine::PredictionStats;

/// Token usage for a generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl From<&PredictionStats> for Usage {
    /// Missing engine counters count as zero.
    fn from(stats: &PredictionStats) -> Self {
        let input_tokens = stats.prompt_tokens_count.unwrap_or(0);
        let output_tokens = stats.predicted_tokens_count.unwrap_or(0);
        Self {
            input_tokens,
            output_tokens,
            total_tokens: stats
                .total_tokens_count
                .unwrap_or(input_tokens.saturating_add(output_tokens)),
        }
    }
}
