//! Error types for the client wire layer.
//!
//! `ClientError` never crosses the boundary of the sentinel-returning request
//! methods on [`OpenAiClient`](crate::client::OpenAiClient); those log the
//! error and substitute their documented fallback value. Only the lifecycle
//! functions (`connect`, `get_or_create`, `get_existing`) surface it directly.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Synchronous access before the async initializer has completed.
    #[error(
        "OpenAiClient is not initialized; call OpenAiClient::get_or_create().await first"
    )]
    NotInitialized,

    /// Transport-level failure from the HTTP client.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// A structurally valid completion response with no choices.
    #[error("response contained no choices")]
    EmptyResponse,

    /// A choice whose message carried no text content.
    #[error("response choice contained no content")]
    MissingContent,

    /// The classification reply was not one of the four expected words.
    #[error("unexpected content kind '{0}'")]
    InvalidContentKind(String),

    /// A streaming run was requested but no assistant was retrieved at init.
    #[error("no assistant available; retrieval failed during initialization")]
    NoAssistant,

    /// Configuration could not be loaded or was incomplete.
    #[error("configuration error: {0}")]
    Config(String),
}
