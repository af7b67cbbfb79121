//! One-shot generation against a scripted engine.

mod common;

use std::sync::Arc;

use common::{Script, ScriptedEngine};
use lmstudio_bridge::engine::{AbortController, AbortReason, EngineError, StopReason};
use lmstudio_bridge::prelude::*;
use lmstudio_bridge::types::{GeneratedContent, ToolCall};
use lmstudio_bridge::tools::ToolParameters;
use pretty_assertions::assert_eq;
use serde_json::json;

fn model_for(engine: Arc<ScriptedEngine>) -> LmStudioChatModel {
    LmStudioProvider::new(engine, ProviderSettings::new()).chat("qwen3-1.7b")
}

fn calculator() -> ToolDeclaration {
    ToolDeclaration::function(
        "calculator",
        "Adds two numbers",
        ToolParameters::object()
            .number("a", "left operand", true)
            .number("b", "right operand", true)
            .build(),
    )
}

#[tokio::test]
async fn plain_answer_finishes_with_stop() {
    let engine = ScriptedEngine::new("qwen3-1.7b", Script::text(&["4"]));
    let model = model_for(engine.clone());

    let result = model
        .generate(&[ModelMessage::user("2+2?")], &CallOptions::default())
        .await
        .expect("generation should succeed");

    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.text.as_deref(), Some("4"));
    assert!(result.tool_calls.is_empty());
    assert_eq!(result.content, vec![GeneratedContent::Text { text: "4".into() }]);
    assert_eq!(result.usage.input_tokens, 12);
    assert_eq!(result.usage.output_tokens, 1);
    assert_eq!(result.response.model_id, "qwen3-1.7b");

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].options.allow_parallel_tool_execution, Some(true));
    assert_eq!(calls[0].options.max_prediction_rounds, None);
    assert!(calls[0].options.signal.is_some());
}

#[tokio::test]
async fn tool_call_round_finishes_with_tool_calls() {
    let engine = ScriptedEngine::new(
        "qwen3-1.7b",
        Script::tool_call(Some("call_1"), "calculator", json!({"a": 1, "b": 1})),
    );
    let model = model_for(engine.clone());
    let options = CallOptions::builder().tools(vec![calculator()]).build();

    let result = model
        .generate(&[ModelMessage::user("What is 1+1?")], &options)
        .await
        .expect("an intentional stop is a success");

    assert_eq!(result.finish_reason, FinishReason::ToolCalls);
    assert_eq!(
        result.tool_calls,
        vec![ToolCall {
            tool_call_id: "call_1".into(),
            tool_name: "calculator".into(),
            args: json!({"a": 1, "b": 1}),
        }]
    );
    assert_eq!(engine.calls()[0].tool_names, vec!["calculator"]);
}

#[tokio::test]
async fn observed_tool_call_overrides_eos() {
    let engine = ScriptedEngine::new(
        "qwen3-1.7b",
        Script::tool_call(None, "calculator", json!({"a": 2, "b": 3}))
            .with_stop_reason(StopReason::EosFound),
    );
    let model = model_for(engine);

    let result = model
        .generate(&[ModelMessage::user("2+3?")], &CallOptions::default())
        .await
        .unwrap();

    assert_eq!(result.finish_reason, FinishReason::ToolCalls);
    assert_eq!(result.tool_calls.len(), 1);
    assert!(result.tool_calls[0].tool_call_id.starts_with("call_"));
}

#[tokio::test]
async fn synthesized_tool_call_id_is_the_same_everywhere() {
    let engine = ScriptedEngine::new(
        "qwen3-1.7b",
        Script::tool_call(None, "calculator", json!({"a": 1, "b": 1})),
    );
    let model = model_for(engine);

    let result = model
        .generate(&[ModelMessage::user("1+1?")], &CallOptions::default())
        .await
        .unwrap();

    let content_ids: Vec<&str> = result
        .content
        .iter()
        .filter_map(|item| match item {
            GeneratedContent::ToolCall(call) => Some(call.tool_call_id.as_str()),
            GeneratedContent::Text { .. } => None,
        })
        .collect();
    let listed_ids: Vec<&str> = result
        .tool_calls
        .iter()
        .map(|call| call.tool_call_id.as_str())
        .collect();

    assert_eq!(content_ids.len(), 1);
    assert!(content_ids[0].starts_with("call_"));
    assert_eq!(content_ids, listed_ids);
}

#[tokio::test]
async fn invalid_provider_block_fails_before_the_engine_runs() {
    let engine = ScriptedEngine::new("qwen3-1.7b", Script::text(&["4"]));
    let model = model_for(engine.clone());
    let mut options = CallOptions::default();
    options
        .provider_options
        .insert("lmstudio".into(), json!({"xtcProbability": "high"}));

    let err = model
        .generate(&[ModelMessage::user("2+2?")], &options)
        .await
        .unwrap_err();

    match err {
        BridgeError::Configuration { path, .. } => assert_eq!(path, "xtcProbability"),
        other => panic!("expected a configuration error, got {other:?}"),
    }
    assert_eq!(engine.load_count(), 0);
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn caller_abort_propagates_unchanged() {
    let engine = ScriptedEngine::new("qwen3-1.7b", Script::text(&["4", "2"]));
    let model = model_for(engine.clone());
    let caller = AbortController::new();
    caller.abort(AbortReason::caller(Some("user navigated away".into())));
    let options = CallOptions::builder().abort_signal(caller.signal()).build();

    let err = model
        .generate(&[ModelMessage::user("2+2?")], &options)
        .await
        .unwrap_err();

    match err {
        BridgeError::Engine(EngineError::Aborted(reason)) => assert_eq!(
            reason,
            AbortReason::caller(Some("user navigated away".into()))
        ),
        other => panic!("expected the caller's abort, got {other:?}"),
    }
    assert_eq!(engine.calls().len(), 1);
}

#[tokio::test]
async fn missing_completion_is_no_content_generated() {
    let engine = ScriptedEngine::new("qwen3-1.7b", Script::text(&["4"]).without_completion());
    let model = model_for(engine);

    let err = model
        .generate(&[ModelMessage::user("2+2?")], &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::NoContentGenerated));
}

#[tokio::test]
async fn engine_failure_propagates_unchanged() {
    let engine = ScriptedEngine::new(
        "qwen3-1.7b",
        Script::text(&["4"]).failing_with(EngineError::failed("GPU out of memory")),
    );
    let model = model_for(engine);

    let err = model
        .generate(&[ModelMessage::user("2+2?")], &CallOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "GPU out of memory");
    assert_eq!(err.category(), lmstudio_bridge::error::ErrorCategory::Engine);
}

#[tokio::test]
async fn unknown_model_maps_to_no_such_model() {
    let engine = ScriptedEngine::failing_load(EngineError::failed("Model not found: nope-7b"));
    let model = LmStudioProvider::new(engine.clone(), ProviderSettings::new()).chat("nope-7b");

    let err = model
        .generate(&[ModelMessage::user("hi")], &CallOptions::default())
        .await
        .unwrap_err();

    match err {
        BridgeError::NoSuchModel { model_id, message } => {
            assert_eq!(model_id, "nope-7b");
            assert_eq!(message, "Model not found: nope-7b");
        }
        other => panic!("expected NoSuchModel, got {other:?}"),
    }
}

#[tokio::test]
async fn other_load_failures_map_to_model_load() {
    let engine = ScriptedEngine::failing_load(EngineError::failed("connection refused"));
    let model = LmStudioProvider::new(engine, ProviderSettings::new()).chat("qwen3-1.7b");

    let err = model
        .generate(&[ModelMessage::user("hi")], &CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::ModelLoad { ref model_id, .. } if model_id == "qwen3-1.7b"));
}

#[tokio::test]
async fn model_is_loaded_once() {
    let engine = ScriptedEngine::new("qwen3-1.7b", Script::text(&["ok"]));
    let model = model_for(engine.clone());

    for _ in 0..3 {
        model
            .generate(&[ModelMessage::user("ping")], &CallOptions::default())
            .await
            .unwrap();
    }

    assert_eq!(engine.load_count(), 1);
    assert_eq!(engine.calls().len(), 3);
}

#[tokio::test]
async fn warnings_travel_with_the_result() {
    let engine = ScriptedEngine::new("qwen3-1.7b", Script::text(&["4"]));
    let model = model_for(engine.clone());
    let options = CallOptions::builder()
        .seed(42)
        .tools(vec![calculator()])
        .tool_choice(ToolChoice::Required)
        .build();
    let prompt = vec![ModelMessage::new(
        Role::User,
        vec![
            ContentPart::text("2+2?"),
            ContentPart::Reasoning {
                text: "scratch".into(),
            },
        ],
    )];

    let result = model.generate(&prompt, &options).await.unwrap();

    assert_eq!(
        result.warnings,
        vec![
            CallWarning::unsupported_setting("seed", None),
            CallWarning::unsupported_content("reasoning"),
            CallWarning::other("Required tool choice is not supported by the engine"),
        ]
    );
    assert_eq!(engine.calls()[0].tool_names, vec!["calculator"]);
}

#[tokio::test]
async fn request_metadata_reflects_merged_settings() {
    let engine = ScriptedEngine::new("qwen3-1.7b", Script::text(&["4"]));
    let settings = ProviderSettings::from_toml_str("preset = \"fast\"\ncpuThreads = 4").unwrap();
    let model = LmStudioProvider::new(engine.clone(), settings).chat("qwen3-1.7b");
    let mut options = CallOptions::builder().temperature(0.3).build();
    options
        .provider_options
        .insert("lmstudio".into(), json!({"cpuThreads": null, "minPSampling": 0.05}));

    let result = model
        .generate(&[ModelMessage::user("2+2?")], &options)
        .await
        .unwrap();

    assert_eq!(
        result.request.settings,
        json!({
            "temperature": 0.3,
            "allowParallelToolExecution": true,
            "preset": "fast",
            "minPSampling": 0.05,
        })
    );
    assert_eq!(result.request.prompt.len(), 1);
    assert_eq!(engine.calls()[0].options.cpu_threads, None);
}
