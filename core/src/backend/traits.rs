//! Backend Traits
//!
//! Trait definition for the remote generation service. The explorer only
//! ever talks to this trait; the Gemini client implements it, and tests
//! substitute scripted implementations.
//!
//! # Design Philosophy
//!
//! The streaming path is modeled as a channel of [`StreamChunk`] values
//! rather than a callback chain: the consumer pulls chunks in arrival
//! order, and superseding a session simply stops applying (and eventually
//! drops) its receiver. Failures travel in-band as a final
//! [`StreamChunk::Failed`] so the UI always has something to display.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events on a definition stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamChunk {
    /// A fragment of definition text
    Text(String),
    /// The stream completed normally
    Done,
    /// The stream failed; carries a human-readable cause
    Failed(String),
}

/// A generated ASCII-art illustration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsciiArt {
    /// The art itself, newline-separated
    pub art: String,
    /// Optional caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Remote generation service
///
/// Three operations, all reached through dependency injection so the core
/// is testable without credentials or network.
#[async_trait]
pub trait GenBackend: Send + Sync {
    /// Backend name (e.g. "Gemini")
    fn name(&self) -> &str;

    /// Stream a definition for `topic`.
    ///
    /// The receiver yields [`StreamChunk::Text`] fragments in arrival
    /// order, terminated by exactly one `Done` or `Failed`. The stream is
    /// finite, single-pass, and not restartable. An unconfigured backend
    /// fails fast with a fixed cause, without attempting the call.
    async fn stream_definition(&self, topic: &str) -> mpsc::Receiver<StreamChunk>;

    /// Generate a single random word or two-word concept, trimmed and
    /// free of surrounding punctuation.
    async fn random_word(&self) -> anyhow::Result<String>;

    /// One raw ASCII-art attempt for `topic`. Retry policy lives in
    /// [`crate::art::generate_ascii_art`], not here.
    async fn ascii_art(&self, topic: &str) -> anyhow::Result<AsciiArt>;
}
