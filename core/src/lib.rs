//! Wordrift Core - Headless Definition Explorer
//!
//! This crate provides the core logic for wordrift, completely independent
//! of any UI framework. It can drive a TUI, a web UI, or run headless for
//! testing with a substitute backend.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       UI Surface (TUI)                     │
//! │        topic submit / word pivot / history select          │
//! └───────────────────────────┬────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼────────────────────────────────┐
//! │                      WORDRIFT CORE                         │
//! │  ┌────────────────────────┴─────────────────────────────┐  │
//! │  │                      Explorer                        │  │
//! │  │  ┌──────────┐  ┌──────────┐  ┌──────────────────┐    │  │
//! │  │  │ Session  │  │ History  │  │     Backend      │    │  │
//! │  │  │  state   │  │  track   │  │   (Gemini API)   │    │  │
//! │  │  └──────────┘  └──────────┘  └──────────────────┘    │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Explorer`]: orchestrates topic submission, stream consumption,
//!   and history updates
//! - [`DefinitionSession`]: ephemeral per-topic state (text, status)
//! - [`HistoryTrack`]: ordered, duplicate-free list of visited topics
//! - [`GenBackend`]: trait over the three remote generation operations
//! - [`GeminiClient`]: the real backend implementation
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use wordrift_core::{Explorer, GeminiClient, GeminiConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = Arc::new(GeminiClient::new(GeminiConfig::from_env()));
//!     let mut explorer = Explorer::new(backend);
//!
//!     let ticket = explorer.submit("serendipity").await;
//!     loop {
//!         let (ticket, chunk) = explorer.next_chunk().await;
//!         explorer.apply(ticket, chunk);
//!         if !explorer.session().is_loading() {
//!             break;
//!         }
//!     }
//!     println!("{}", explorer.session().text);
//! }
//! ```

pub mod art;
pub mod backend;
pub mod config;
pub mod history;
pub mod session;
pub mod tokens;

pub use art::{generate_ascii_art, ArtError, MAX_ART_ATTEMPTS};
pub use backend::{AsciiArt, GenBackend, GeminiClient, StreamChunk};
pub use config::{GeminiConfig, UNCONFIGURED_MESSAGE};
pub use history::HistoryTrack;
pub use session::{DefinitionSession, Explorer, SessionId, SessionStatus};
pub use tokens::{is_topic_match, strip_punctuation, tokenize, Token};
