//! ASCII-Art Generation
//!
//! Bounded-retry wrapper over the backend's raw art attempt. A response
//! whose `art` field is empty or whitespace-only fails structural
//! validation and is retried exactly like a transient call failure.
//! Retries are immediate (no backoff); once the budget is exhausted the
//! error names the attempt count and the last cause.

use thiserror::Error;

use crate::backend::{AsciiArt, GenBackend};

/// Total attempts per art request, validation failures included
pub const MAX_ART_ATTEMPTS: u32 = 2;

/// Terminal art-generation error
#[derive(Debug, Error)]
pub enum ArtError {
    #[error("Could not generate ASCII art after {attempts} attempts: {last_cause}")]
    Exhausted { attempts: u32, last_cause: String },
}

/// Generate ASCII art for `topic`, retrying up to [`MAX_ART_ATTEMPTS`].
pub async fn generate_ascii_art<B: GenBackend + ?Sized>(
    backend: &B,
    topic: &str,
) -> Result<AsciiArt, ArtError> {
    let mut last_cause = String::new();

    for attempt in 1..=MAX_ART_ATTEMPTS {
        match backend.ascii_art(topic).await {
            Ok(art) if !art.art.trim().is_empty() => return Ok(art),
            Ok(_) => {
                last_cause = "invalid or empty ASCII art in response".to_string();
            }
            Err(e) => {
                last_cause = e.to_string();
            }
        }

        tracing::warn!(
            attempt,
            max_attempts = MAX_ART_ATTEMPTS,
            topic,
            cause = %last_cause,
            "ASCII art attempt failed"
        );
    }

    Err(ArtError::Exhausted {
        attempts: MAX_ART_ATTEMPTS,
        last_cause,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::mpsc;

    use crate::backend::StreamChunk;

    /// Backend that always returns the same art result and counts attempts
    struct FixedArtBackend {
        result: AsciiArt,
        attempts: AtomicU32,
    }

    impl FixedArtBackend {
        fn returning(art: &str) -> Self {
            Self {
                result: AsciiArt {
                    art: art.to_string(),
                    text: None,
                },
                attempts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl GenBackend for FixedArtBackend {
        fn name(&self) -> &str {
            "fixed-art"
        }

        async fn stream_definition(&self, _topic: &str) -> mpsc::Receiver<StreamChunk> {
            let (_tx, rx) = mpsc::channel(1);
            rx
        }

        async fn random_word(&self) -> anyhow::Result<String> {
            anyhow::bail!("not used")
        }

        async fn ascii_art(&self, _topic: &str) -> anyhow::Result<AsciiArt> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let backend = FixedArtBackend::returning("  ><>  ");
        let art = generate_ascii_art(&backend, "fish").await.unwrap();
        assert_eq!(art.art, "  ><>  ");
        assert_eq!(backend.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_art_exhausts_retries() {
        let backend = FixedArtBackend::returning("   ");
        let err = generate_ascii_art(&backend, "void").await.unwrap_err();

        assert_eq!(backend.attempts.load(Ordering::SeqCst), MAX_ART_ATTEMPTS);
        let message = err.to_string();
        assert!(message.contains("2 attempts"), "got: {message}");
        assert!(message.contains("empty ASCII art"), "got: {message}");
    }
}
