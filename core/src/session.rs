//! Session Management
//!
//! A [`DefinitionSession`] is the ephemeral state for one topic request:
//! the topic, the text accumulated so far, and where the request is in its
//! lifecycle. Sessions are replaced wholesale when a new topic is
//! submitted; nothing carries over.
//!
//! The [`Explorer`] orchestrates: it owns the backend handle, the current
//! session, its chunk receiver, and the history track. `submit` is the
//! single entry point for every topic source (seed, word pivot, history
//! selection, random word).
//!
//! # Supersession
//!
//! A new `submit` while a stream is in flight supersedes it. Each chunk is
//! tagged with the [`SessionId`] it was received for, and [`Explorer::apply`]
//! drops chunks whose ticket no longer matches the current session. No
//! cancellation signal is sent upstream; replacing the receiver is enough
//! for the producer to notice and stop on its next send.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::backend::{GenBackend, StreamChunk};
use crate::history::HistoryTrack;

/// Unique identity of one definition session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a definition session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// No topic submitted yet
    Idle,
    /// Stream in flight; text is still growing
    Loading,
    /// Stream completed; text is final and interactive
    Ready,
    /// Stream failed; the failure text is part of the definition text and
    /// rendering is identical to `Ready`
    Errored,
}

/// Ephemeral state for one topic request
#[derive(Clone, Debug)]
pub struct DefinitionSession {
    /// Session identity, used to guard against superseded chunks
    pub id: SessionId,
    /// The topic this session is defining
    pub topic: String,
    /// Definition text accumulated so far. Grows monotonically while
    /// loading, immutable once the stream ends.
    pub text: String,
    /// Lifecycle status
    pub status: SessionStatus,
    /// Failure cause, when errored
    pub error: Option<String>,
}

impl DefinitionSession {
    /// The empty pre-submission session
    pub fn idle() -> Self {
        Self {
            id: SessionId::new(),
            topic: String::new(),
            text: String::new(),
            status: SessionStatus::Idle,
            error: None,
        }
    }

    /// A fresh loading session for `topic`
    pub fn loading(topic: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            topic: topic.into(),
            text: String::new(),
            status: SessionStatus::Loading,
            error: None,
        }
    }

    /// Append a streamed fragment
    pub fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    /// Mark the stream complete
    pub fn complete(&mut self) {
        self.status = SessionStatus::Ready;
    }

    /// Record a stream failure. The failure text is appended as if it were
    /// a final chunk, so the user always sees a readable message.
    pub fn fail(&mut self, cause: &str) {
        self.append(&format!(
            "Error: Could not generate content for \"{}\". {}",
            self.topic, cause
        ));
        self.error = Some(cause.to_string());
        self.status = SessionStatus::Errored;
    }

    /// Whether the stream is still in flight
    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    /// Whether the text is final and should render interactively
    pub fn is_interactive(&self) -> bool {
        matches!(self.status, SessionStatus::Ready | SessionStatus::Errored)
    }
}

/// Orchestrates topic submission, stream consumption, and history
pub struct Explorer {
    backend: Arc<dyn GenBackend>,
    session: DefinitionSession,
    history: HistoryTrack,
    stream: Option<mpsc::Receiver<StreamChunk>>,
}

impl Explorer {
    /// Create an explorer over the given backend
    pub fn new(backend: Arc<dyn GenBackend>) -> Self {
        Self {
            backend,
            session: DefinitionSession::idle(),
            history: HistoryTrack::new(),
            stream: None,
        }
    }

    /// Submit a topic: replaces the current session, appends the topic to
    /// history (before the fetch, so an errored topic still shows), and
    /// starts consuming the definition stream.
    ///
    /// Returns the new session's ticket.
    pub async fn submit(&mut self, topic: impl Into<String>) -> SessionId {
        let topic = topic.into();
        tracing::debug!(%topic, "submitting topic");

        self.session = DefinitionSession::loading(topic.clone());
        self.history.add(topic.clone());
        self.stream = Some(self.backend.stream_definition(&topic).await);

        self.session.id
    }

    /// Ask the backend for a random word and submit it.
    pub async fn random_topic(&mut self) -> anyhow::Result<SessionId> {
        let word = self.backend.random_word().await?;
        Ok(self.submit(word).await)
    }

    /// Wait for the next chunk of the current stream.
    ///
    /// Pends forever when no stream is active, which makes this safe to
    /// park in a `select!` arm. A channel that closes without a terminal
    /// chunk is reported as a failure so the session cannot hang in
    /// `Loading`.
    pub async fn next_chunk(&mut self) -> (SessionId, StreamChunk) {
        let ticket = self.session.id;
        match self.stream.as_mut() {
            Some(rx) => match rx.recv().await {
                Some(chunk) => (ticket, chunk),
                None => (
                    ticket,
                    StreamChunk::Failed("stream ended unexpectedly".to_string()),
                ),
            },
            None => std::future::pending().await,
        }
    }

    /// Apply a chunk to the session it was received for.
    ///
    /// Returns `false` when the chunk belonged to a superseded session and
    /// was dropped.
    pub fn apply(&mut self, ticket: SessionId, chunk: StreamChunk) -> bool {
        if ticket != self.session.id {
            tracing::debug!(?ticket, "dropping chunk from superseded session");
            return false;
        }

        match chunk {
            StreamChunk::Text(fragment) => {
                if self.session.is_loading() {
                    self.session.append(&fragment);
                }
            }
            StreamChunk::Done => {
                self.session.complete();
                self.stream = None;
                tracing::debug!(topic = %self.session.topic, "definition stream complete");
            }
            StreamChunk::Failed(cause) => {
                self.session.fail(&cause);
                self.stream = None;
                tracing::warn!(topic = %self.session.topic, %cause, "definition stream failed");
            }
        }
        true
    }

    /// The current session
    pub fn session(&self) -> &DefinitionSession {
        &self.session
    }

    /// The visited-topic history
    pub fn history(&self) -> &HistoryTrack {
        &self.history
    }

    /// A handle to the backend, for side tasks like art generation
    pub fn backend(&self) -> Arc<dyn GenBackend> {
        Arc::clone(&self.backend)
    }
}
