//! Explorer integration tests
//!
//! Drive the explorer end to end against substitute backends: scripted
//! chunk sequences for the streaming paths, queued manual channels for
//! supersession, and fixed responses for the random-word path.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use wordrift_core::{AsciiArt, Explorer, GenBackend, SessionStatus, StreamChunk};

/// Backend that replays the same chunk script for every topic
struct ScriptedBackend {
    script: Vec<StreamChunk>,
    word: String,
}

impl ScriptedBackend {
    fn new(script: Vec<StreamChunk>) -> Self {
        Self {
            script,
            word: "gossamer".to_string(),
        }
    }
}

#[async_trait]
impl GenBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_definition(&self, _topic: &str) -> mpsc::Receiver<StreamChunk> {
        let (tx, rx) = mpsc::channel(16);
        let script = self.script.clone();
        tokio::spawn(async move {
            for chunk in script {
                if tx.send(chunk).await.is_err() {
                    return;
                }
            }
        });
        rx
    }

    async fn random_word(&self) -> anyhow::Result<String> {
        Ok(self.word.clone())
    }

    async fn ascii_art(&self, _topic: &str) -> anyhow::Result<AsciiArt> {
        anyhow::bail!("not scripted")
    }
}

/// Backend that hands out pre-built receivers, one per submission, so a
/// test can hold the sender side and feed chunks manually
struct ManualBackend {
    pending: Mutex<VecDeque<mpsc::Receiver<StreamChunk>>>,
}

impl ManualBackend {
    fn queue(receivers: Vec<mpsc::Receiver<StreamChunk>>) -> Self {
        Self {
            pending: Mutex::new(receivers.into()),
        }
    }
}

#[async_trait]
impl GenBackend for ManualBackend {
    fn name(&self) -> &str {
        "manual"
    }

    async fn stream_definition(&self, _topic: &str) -> mpsc::Receiver<StreamChunk> {
        self.pending
            .lock()
            .unwrap()
            .pop_front()
            .expect("more submissions than queued streams")
    }

    async fn random_word(&self) -> anyhow::Result<String> {
        anyhow::bail!("not used")
    }

    async fn ascii_art(&self, _topic: &str) -> anyhow::Result<AsciiArt> {
        anyhow::bail!("not used")
    }
}

/// Apply chunks until the current session leaves `Loading`
async fn drain(explorer: &mut Explorer) {
    while explorer.session().is_loading() {
        let (ticket, chunk) = explorer.next_chunk().await;
        explorer.apply(ticket, chunk);
    }
}

fn text(s: &str) -> StreamChunk {
    StreamChunk::Text(s.to_string())
}

#[tokio::test]
async fn streaming_accumulates_in_order() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        text("A tide "),
        text("is the rise "),
        text("and fall of sea levels."),
        StreamChunk::Done,
    ]));
    let mut explorer = Explorer::new(backend);

    explorer.submit("tide").await;
    drain(&mut explorer).await;

    let session = explorer.session();
    assert_eq!(session.status, SessionStatus::Ready);
    assert_eq!(session.text, "A tide is the rise and fall of sea levels.");
    assert_eq!(explorer.history().topics(), ["tide"]);
}

#[tokio::test]
async fn stream_failure_becomes_readable_text() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        text("The "),
        StreamChunk::Failed("network down".to_string()),
    ]));
    let mut explorer = Explorer::new(backend);

    explorer.submit("Ocean").await;
    drain(&mut explorer).await;

    let session = explorer.session();
    assert_eq!(session.status, SessionStatus::Errored);
    assert_eq!(
        session.text,
        "The Error: Could not generate content for \"Ocean\". network down"
    );
    // Append-before-fetch: the errored topic still shows in history
    assert_eq!(explorer.history().topics(), ["Ocean"]);
    // An errored session renders exactly like a ready one
    assert!(session.is_interactive());
}

#[tokio::test]
async fn superseded_chunks_are_dropped() {
    let (tx_a, rx_a) = mpsc::channel(16);
    let (tx_b, rx_b) = mpsc::channel(16);
    let backend = Arc::new(ManualBackend::queue(vec![rx_a, rx_b]));
    let mut explorer = Explorer::new(backend);

    let ticket_a = explorer.submit("alpha").await;
    tx_a.send(text("first ")).await.unwrap();
    let (ticket, chunk) = explorer.next_chunk().await;
    assert!(explorer.apply(ticket, chunk));
    assert_eq!(explorer.session().text, "first ");

    // Submit B while A is still loading: A is superseded
    explorer.submit("beta").await;
    assert_eq!(explorer.session().text, "");

    // A late chunk for A must not land in B's text
    assert!(!explorer.apply(ticket_a, text("stale ")));
    assert_eq!(explorer.session().text, "");

    tx_b.send(text("B is second.")).await.unwrap();
    tx_b.send(StreamChunk::Done).await.unwrap();
    drain(&mut explorer).await;

    let session = explorer.session();
    assert_eq!(session.topic, "beta");
    assert_eq!(session.text, "B is second.");
    assert_eq!(session.status, SessionStatus::Ready);

    // The superseded receiver was dropped, so A's producer sees a closed
    // channel on its next send
    assert!(tx_a.send(text("late")).await.is_err());

    assert_eq!(explorer.history().topics(), ["alpha", "beta"]);
}

#[tokio::test]
async fn history_never_shows_a_topic_twice() {
    let backend = Arc::new(ScriptedBackend::new(vec![StreamChunk::Done]));
    let mut explorer = Explorer::new(backend);

    for topic in ["rust", "crab", "rust"] {
        explorer.submit(topic).await;
        drain(&mut explorer).await;
    }

    assert_eq!(explorer.history().topics(), ["rust", "crab"]);
}

#[tokio::test]
async fn random_topic_submits_the_backend_word() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        text("Gossamer is a fine film of cobwebs."),
        StreamChunk::Done,
    ]));
    let mut explorer = Explorer::new(backend);

    explorer.random_topic().await.unwrap();
    drain(&mut explorer).await;

    assert_eq!(explorer.session().topic, "gossamer");
    assert_eq!(explorer.history().topics(), ["gossamer"]);
}

#[tokio::test]
async fn text_is_frozen_after_completion() {
    let backend = Arc::new(ScriptedBackend::new(vec![text("done."), StreamChunk::Done]));
    let mut explorer = Explorer::new(backend);

    let ticket = explorer.submit("done").await;
    drain(&mut explorer).await;
    assert_eq!(explorer.session().text, "done.");

    // A stray text chunk for the same session no longer mutates the text
    explorer.apply(ticket, text(" extra"));
    assert_eq!(explorer.session().text, "done.");
}

#[tokio::test]
async fn closed_stream_without_terminal_chunk_fails() {
    // Script with no Done/Failed: the producer task ends and the channel
    // closes with the session still loading
    let backend = Arc::new(ScriptedBackend::new(vec![text("partial ")]));
    let mut explorer = Explorer::new(backend);

    explorer.submit("partial").await;
    drain(&mut explorer).await;

    let session = explorer.session();
    assert_eq!(session.status, SessionStatus::Errored);
    assert!(session.text.starts_with("partial Error: Could not generate"));
    assert!(session.text.contains("stream ended unexpectedly"));
}
