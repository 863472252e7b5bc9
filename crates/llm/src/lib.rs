//! LLM backends, factory, and output parsing
//!
//! Backends:
//! - `lmstudio` / `openai`: one OpenAI-compatible chat backend, differing
//!   only in base URL and auth
//! - `google`: Gemini `generateContent`
//! - `vllm` / `ollama`: declared alternate runtimes, not yet built; the
//!   factory returns a distinct not-implemented error for them
//!
//! The factory shares the embedding factory's fallback policy: empty or
//! unrecognized tags resolve to the local proxy.
//!
//! [`extract_json`] is a standalone entry point for callers that prompt a
//! model for structured output: it pulls the first JSON object out of a
//! free-form reply (fenced block, embedded object, or bare JSON). The chat
//! flow itself returns plain text and does not use it.

mod backend;
mod extract;
mod factory;
mod google;

pub use backend::{OpenAiCompatChat, OpenAiCompatChatConfig};
pub use extract::extract_json;
pub use factory::{resolve_or_local_proxy, LlmFactory, LlmProviderKind};
pub use google::{GoogleChat, GoogleChatConfig};
