//! Core data types shared across the client.
//!
//! This module defines the message shape posted to assistant threads and the
//! closed set of content kinds the classifier may answer with.

use serde::{Deserialize, Serialize};

// --- Message Roles ---

/// The role of a message in a conversation.
///
/// The API uses roles to distinguish who said what:
/// - `System`: instructions to the AI (invisible to the user)
/// - `User`: the human's input
/// - `Assistant`: the AI's response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

// --- Thread Messages ---

/// A single message appended to an assistant thread.
///
/// Owned by the caller; the client only reads it. The thread itself is an
/// opaque server-side handle identified by a string id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: Role,
    pub content: String,
}

impl ThreadMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// --- Content Kinds ---

/// The kind of reply the bot should produce next, as decided by the
/// classification call: a plain message, a GIF, a YouTube video, or a website
/// link. Anything outside this set is an invalid classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Message,
    Gif,
    YouTube,
    Website,
}

impl ContentKind {
    /// The lowercase word the classifier is expected to answer with.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Message => "message",
            ContentKind::Gif => "gif",
            ContentKind::YouTube => "youtube",
            ContentKind::Website => "website",
        }
    }

    /// Parse a classifier reply, case-insensitively. Returns `None` for any
    /// word outside the four-member set.
    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "message" => Some(ContentKind::Message),
            "gif" => Some(ContentKind::Gif),
            "youtube" => Some(ContentKind::YouTube),
            "website" => Some(ContentKind::Website),
            _ => None,
        }
    }
}
