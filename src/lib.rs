//! chatbridge - the OpenAI adapter layer for a chat bot.
//!
//! One component: [`OpenAiClient`], a process-wide client owning a single
//! connection to the conversational-AI service. It exposes assistant-thread
//! operations (create, post, streaming runs) and a handful of single-shot
//! chat-completion helpers (image description, text/link summaries,
//! content-kind classification), each using its own configured model slot.
//!
//! Request methods never propagate transport errors; they log and return
//! documented sentinel values so callers treat the sentinel as the definitive
//! failure signal. See [`client::OpenAiClient`] for the full contract.

pub mod client;
pub mod config;
pub mod error;
pub mod stream;
pub mod types;

pub use client::{Assistant, OpenAiClient, NO_DESCRIPTION, NO_SUMMARY};
pub use config::{AppConfig, ModelSlot, ModelsConfig, OpenAiConfig};
pub use error::ClientError;
pub use stream::{RunEvent, RunEventHandler};
pub use types::{ContentKind, Role, ThreadMessage};
