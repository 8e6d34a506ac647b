//! PairAgent LLM - provider abstraction for plan generation
//!
//! A single [`LLMProvider`] interface over hosted chat-completion APIs:
//!
//! - OpenAI (default model `gpt-4o-mini`)
//! - Any OpenAI-compatible server (vLLM, llama.cpp, LM Studio, ...)
//! - Anthropic (Claude)
//!
//! The LLM only ever *proposes* a plan. Callers validate its output and
//! fall back to deterministic planning when no provider is configured or a
//! request fails.

pub mod providers;
pub mod router;
pub mod types;

pub use providers::*;
pub use router::*;
pub use types::*;
