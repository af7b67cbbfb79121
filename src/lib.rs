//! lmstudio-bridge — the generic text-generation contract on LM Studio's `act`.
//!
//! `act` runs an open-ended, multi-round tool loop. This crate adapts it to a
//! single-shot contract: one call in, one result (or one event stream) out,
//! with tool calls reported back to the caller instead of executed.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use lmstudio_bridge::prelude::*;
//!
//! # async fn example(engine: Arc<dyn lmstudio_bridge::engine::Engine>) -> lmstudio_bridge::error::Result<()> {
//! let provider = LmStudioProvider::new(engine, ProviderSettings::from_env());
//! let model = provider.chat("qwen3-1.7b");
//! let result = model
//!     .generate(&[ModelMessage::user("2+2?")], &CallOptions::default())
//!     .await?;
//! println!("{:?} ({})", result.text, result.finish_reason);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod options;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
