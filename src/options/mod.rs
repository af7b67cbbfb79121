//! Resolution of the final `act` options from layered configuration.
//!
//! Three layers contribute, lowest precedence first:
//!
//! 1. provider-level [`ChatSettings`] (from [`ProviderSettings`](crate::config::ProviderSettings)),
//! 2. the generic [`CallOptions`] of the call,
//! 3. the provider-specific block in `CallOptions::provider_options`.
//!
//! Every layer is projected to [`ExplicitActOptions`], where each field
//! remembers whether it was never mentioned or explicitly cleared. The layers
//! are stacked field by field and only the final [`ExplicitActOptions::into_options`]
//! pass collapses both kinds of absence into a missing field.

pub mod explicit;
pub mod settings;
pub mod validation;

pub use explicit::Explicit;
pub use settings::ChatSettings;
pub use validation::parse_chat_settings;

use tracing::debug;

use crate::engine::{ActOptions, StructuredPrediction};
use crate::error::Result;
use crate::types::{CallOptions, CallWarning, ResponseFormat};

/// `act` options before absence is projected away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplicitActOptions {
    pub max_tokens: Explicit<u32>,
    pub temperature: Explicit<f64>,
    pub stop_strings: Explicit<Vec<String>>,
    pub top_k_sampling: Explicit<u32>,
    pub top_p_sampling: Explicit<f64>,
    pub repeat_penalty: Explicit<f64>,
    pub structured: Explicit<StructuredPrediction>,
    pub chat: ChatSettings,
}

impl ExplicitActOptions {
    /// A layer that only carries engine-specific settings.
    pub fn from_chat_settings(chat: ChatSettings) -> Self {
        Self {
            chat,
            ..Self::default()
        }
    }

    /// Project the generic call options.
    ///
    /// Settings without an engine counterpart are reported as warnings.
    pub fn from_call(call: &CallOptions) -> (Self, Vec<CallWarning>) {
        let mut warnings = Vec::new();
        if call.presence_penalty.is_some() {
            warnings.push(CallWarning::unsupported_setting("presencePenalty", None));
        }
        if call.seed.is_some() {
            warnings.push(CallWarning::unsupported_setting("seed", None));
        }

        let structured = match &call.response_format {
            Some(ResponseFormat::Json { schema, .. }) => {
                Explicit::Value(StructuredPrediction::Json {
                    json_schema: schema.clone(),
                })
            }
            Some(ResponseFormat::Text) | None => Explicit::Unset,
        };

        let layer = Self {
            max_tokens: call.max_output_tokens.into(),
            temperature: call.temperature.into(),
            stop_strings: call.stop_sequences.clone().into(),
            top_k_sampling: call.top_k.into(),
            top_p_sampling: call.top_p.into(),
            repeat_penalty: call.frequency_penalty.into(),
            structured,
            chat: ChatSettings::default(),
        };
        (layer, warnings)
    }

    /// Stack this layer over `lower`, field by field.
    pub fn layer_over(self, lower: Self) -> Self {
        Self {
            max_tokens: self.max_tokens.layer_over(lower.max_tokens),
            temperature: self.temperature.layer_over(lower.temperature),
            stop_strings: self.stop_strings.layer_over(lower.stop_strings),
            top_k_sampling: self.top_k_sampling.layer_over(lower.top_k_sampling),
            top_p_sampling: self.top_p_sampling.layer_over(lower.top_p_sampling),
            repeat_penalty: self.repeat_penalty.layer_over(lower.repeat_penalty),
            structured: self.structured.layer_over(lower.structured),
            chat: self.chat.layer_over(lower.chat),
        }
    }

    /// Strip every field that is not a value.
    ///
    /// Parallel tool execution is always allowed. The signal and the round
    /// cap are left for the caller of `act` to fill in.
    pub fn into_options(self) -> ActOptions {
        let chat = self.chat;
        ActOptions {
            max_tokens: self.max_tokens.into_option(),
            temperature: self.temperature.into_option(),
            stop_strings: self.stop_strings.into_option(),
            top_k_sampling: self.top_k_sampling.into_option(),
            top_p_sampling: self.top_p_sampling.into_option(),
            repeat_penalty: self.repeat_penalty.into_option(),
            structured: self.structured.into_option(),

            max_prediction_rounds: None,
            allow_parallel_tool_execution: Some(true),

            context_overflow_policy: chat.context_overflow_policy.into_option(),
            tool_call_stop_strings: chat.tool_call_stop_strings.into_option(),
            xtc_probability: chat.xtc_probability.into_option(),
            xtc_threshold: chat.xtc_threshold.into_option(),
            cpu_threads: chat.cpu_threads.into_option(),
            draft_model: chat.draft_model.into_option(),
            reasoning_parsing: chat.reasoning_parsing.into_option(),
            preset: chat.preset.into_option(),
            min_p_sampling: chat.min_p_sampling.into_option(),

            log_probs: chat.log_probs.into_option(),
            prompt_template: chat.prompt_template.into_option(),
            raw_tools: chat.raw_tools.into_option(),

            speculative_decoding_num_draft_tokens_exact: chat
                .speculative_decoding_num_draft_tokens_exact
                .into_option(),
            speculative_decoding_min_draft_length_to_consider: chat
                .speculative_decoding_min_draft_length_to_consider
                .into_option(),
            speculative_decoding_min_continue_drafting_probability: chat
                .speculative_decoding_min_continue_drafting_probability
                .into_option(),
            raw: chat.raw.into_option(),

            signal: None,
        }
    }
}

/// Merge provider settings, call options and the provider block into `act` options.
///
/// Fails with [`BridgeError::Configuration`](crate::error::BridgeError::Configuration)
/// if the block addressed to `provider` does not validate; in that case
/// nothing is merged.
pub fn convert_call_options(
    provider: &str,
    call: &CallOptions,
    settings: &ChatSettings,
) -> Result<(ActOptions, Vec<CallWarning>)> {
    let block = match call.provider_options_for(provider) {
        Some(block) if !block.is_null() => Some(parse_chat_settings(provider, block)?),
        _ => None,
    };

    let (call_layer, warnings) = ExplicitActOptions::from_call(call);
    let mut merged = call_layer.layer_over(ExplicitActOptions::from_chat_settings(settings.clone()));
    if let Some(block) = block {
        merged = ExplicitActOptions::from_chat_settings(block).layer_over(merged);
    }

    let options = merged.into_options();
    debug!(
        provider,
        warnings = warnings.len(),
        settings = %options.to_raw_settings(),
        "resolved act options"
    );
    Ok((options, warnings))
}
