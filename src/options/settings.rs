//! Engine-specific chat settings, shared by provider defaults and per-call blocks.

use serde::{Deserialize, Serialize};

use super::explicit::Explicit;
use crate::engine::{ContextOverflowPolicy, KvConfig, ReasoningParsing, ToolUseSetting};

/// Engine-specific knobs with no counterpart in the generic call options.
///
/// Appears twice in the merge: as provider-level defaults and as the
/// per-call block under `provider_options["lmstudio"]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSettings {
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub context_overflow_policy: Explicit<ContextOverflowPolicy>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub tool_call_stop_strings: Explicit<Vec<String>>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub xtc_probability: Explicit<f64>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub xtc_threshold: Explicit<f64>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub cpu_threads: Explicit<u32>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub draft_model: Explicit<String>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub reasoning_parsing: Explicit<ReasoningParsing>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub preset: Explicit<String>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub min_p_sampling: Explicit<f64>,

    // Deprecated by the engine but still forwarded.
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub log_probs: Explicit<u32>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub prompt_template: Explicit<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub raw_tools: Explicit<ToolUseSetting>,

    // Experimental.
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub speculative_decoding_num_draft_tokens_exact: Explicit<u32>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub speculative_decoding_min_draft_length_to_consider: Explicit<u32>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub speculative_decoding_min_continue_drafting_probability: Explicit<f64>,
    #[serde(default, skip_serializing_if = "Explicit::is_unset")]
    pub raw: Explicit<KvConfig>,
}

impl ChatSettings {
    /// Stack these settings over `lower`, field by field.
    pub fn layer_over(self, lower: Self) -> Self {
        Self {
            context_overflow_policy: self
                .context_overflow_policy
                .layer_over(lower.context_overflow_policy),
            tool_call_stop_strings: self
                .tool_call_stop_strings
                .layer_over(lower.tool_call_stop_strings),
            xtc_probability: self.xtc_probability.layer_over(lower.xtc_probability),
            xtc_threshold: self.xtc_threshold.layer_over(lower.xtc_threshold),
            cpu_threads: self.cpu_threads.layer_over(lower.cpu_threads),
            draft_model: self.draft_model.layer_over(lower.draft_model),
            reasoning_parsing: self.reasoning_parsing.layer_over(lower.reasoning_parsing),
            preset: self.preset.layer_over(lower.preset),
            min_p_sampling: self.min_p_sampling.layer_over(lower.min_p_sampling),
            log_probs: self.log_probs.layer_over(lower.log_probs),
            prompt_template: self.prompt_template.layer_over(lower.prompt_template),
            raw_tools: self.raw_tools.layer_over(lower.raw_tools),
            speculative_decoding_num_draft_tokens_exact: self
                .speculative_decoding_num_draft_tokens_exact
                .layer_over(lower.speculative_decoding_num_draft_tokens_exact),
            speculative_decoding_min_draft_length_to_consider: self
                .speculative_decoding_min_draft_length_to_consider
                .layer_over(lower.speculative_decoding_min_draft_length_to_consider),
            speculative_decoding_min_continue_drafting_probability: self
                .speculative_decoding_min_continue_drafting_probability
                .layer_over(lower.speculative_decoding_min_continue_drafting_probability),
            raw: self.raw.layer_over(lower.raw),
        }
    }
}
