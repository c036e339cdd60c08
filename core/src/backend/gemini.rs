//! Gemini Backend Implementation
//!
//! Talks to the Gemini REST API directly:
//! - `:streamGenerateContent?alt=sse` for the definition stream
//! - `:generateContent` for random words and ASCII art
//!
//! The ASCII-art call constrains the response to a fixed JSON schema with a
//! required `art` string field; thinking is disabled on every call for the
//! lowest possible latency.
//!
//! Streaming failures are delivered in-band on the chunk channel (the UI
//! renders them as text), so this module never surfaces a streaming error
//! as a bare `Err`.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::{GeminiConfig, UNCONFIGURED_MESSAGE};
use crate::tokens::strip_punctuation;

use super::traits::{AsciiArt, GenBackend, StreamChunk};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const RANDOM_WORD_PROMPT: &str = "Generate a single, random, interesting English word or a \
     two-word concept. It can be a noun, verb, adjective, or a proper noun. Respond with only \
     the word or concept itself, with no extra text, punctuation, or formatting.";

fn definition_prompt(topic: &str) -> String {
    format!(
        "Provide a concise, single-paragraph encyclopedia-style definition for the term: \
         \"{topic}\". Be informative and neutral. Do not use markdown, titles, or any special \
         formatting. Respond with only the text of the definition itself."
    )
}

fn art_prompt(topic: &str) -> String {
    format!(
        "Create a meta ASCII visualization for the word \"{topic}\".\n\
         - The shape of the art should mirror the concept of the word. For example, \
         \"explosion\" might look like lines radiating from a center, and \"hierarchy\" might \
         be a pyramid.\n\
         - Use a palette of ASCII and box-drawing characters like: \
         │─┌┐└┘├┤┬┴┼►◄▲▼○●◐◑░▒▓█▀▄■□▪▫★☆♦♠♣♥⟨⟩/\\_|.\n\
         - The art should be a single string with '\\n' for line breaks."
    )
}

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client from configuration
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    /// Create from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn generate_url(&self, model: &str, key: &str) -> String {
        format!("{BASE_URL}/{model}:generateContent?key={key}")
    }

    fn stream_url(&self, model: &str, key: &str) -> String {
        format!("{BASE_URL}/{model}:streamGenerateContent?alt=sse&key={key}")
    }

    /// Send a non-streaming request and extract the first candidate text
    async fn generate_text(
        &self,
        model: &str,
        prompt: String,
        generation_config: Option<GenerationConfig>,
    ) -> anyhow::Result<String> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!(UNCONFIGURED_MESSAGE))?;

        let body = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config,
        };

        let response = self
            .http
            .post(self.generate_url(model, key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {status}: {}", api_error_message(&body));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .first_text()
            .ok_or_else(|| anyhow::anyhow!("Gemini returned no text in the response candidates"))
    }
}

#[async_trait]
impl GenBackend for GeminiClient {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn stream_definition(&self, topic: &str) -> mpsc::Receiver<StreamChunk> {
        let (tx, rx) = mpsc::channel(100);

        let Some(key) = self.config.api_key.as_deref() else {
            let _ = tx.send(StreamChunk::Failed(UNCONFIGURED_MESSAGE.to_string())).await;
            return rx;
        };

        let body = GenerateContentRequest {
            contents: vec![Content::user(definition_prompt(topic))],
            generation_config: Some(GenerationConfig::no_thinking()),
        };

        let response = match self
            .http
            .post(self.stream_url(&self.config.text_model, key))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let _ = tx.send(StreamChunk::Failed(e.to_string())).await;
                return rx;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let _ = tx
                .send(StreamChunk::Failed(format!(
                    "Gemini returned {status}: {}",
                    api_error_message(&body)
                )))
                .await;
            return rx;
        }

        let mut stream = response.bytes_stream();
        let topic = topic.to_string();

        tokio::spawn(async move {
            let mut buffer = String::new();

            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));

                        // Parse newline-delimited SSE events
                        while let Some(pos) = buffer.find('\n') {
                            let line = buffer[..pos].trim().to_string();
                            buffer = buffer[pos + 1..].to_string();

                            let Some(payload) = sse_payload(&line) else {
                                continue;
                            };
                            if let Ok(data) =
                                serde_json::from_str::<GenerateContentResponse>(payload)
                            {
                                if let Some(text) = data.first_text() {
                                    if tx.send(StreamChunk::Text(text)).await.is_err() {
                                        // Receiver dropped (session superseded)
                                        tracing::debug!(%topic, "definition stream abandoned");
                                        return;
                                    }
                                }
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(StreamChunk::Failed(e.to_string())).await;
                        return;
                    }
                }
            }

            let _ = tx.send(StreamChunk::Done).await;
        });

        rx
    }

    async fn random_word(&self) -> anyhow::Result<String> {
        let text = self
            .generate_text(
                &self.config.text_model,
                RANDOM_WORD_PROMPT.to_string(),
                Some(GenerationConfig::no_thinking()),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Could not get random word: {e}"))?;

        let word = strip_punctuation(text.trim()).to_string();
        if word.is_empty() {
            anyhow::bail!("Could not get random word: empty response");
        }
        Ok(word)
    }

    async fn ascii_art(&self, topic: &str) -> anyhow::Result<AsciiArt> {
        let json = self
            .generate_text(
                &self.config.art_model,
                art_prompt(topic),
                Some(GenerationConfig::art_schema()),
            )
            .await?;

        let art: AsciiArt = serde_json::from_str(json.trim())?;
        Ok(art)
    }
}

/// Extract the payload of an SSE `data:` line, if any
fn sse_payload(line: &str) -> Option<&str> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }
    Some(payload)
}

/// Pull a readable message out of a Gemini error body, falling back to the
/// raw body when it does not parse
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status = wrapper.error.status.unwrap_or_default();
            let message = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status.is_empty() {
                message
            } else {
                format!("{status}: {message}")
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: String) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    thinking_config: ThinkingConfig,
}

impl GenerationConfig {
    /// Thinking disabled, plain text response
    fn no_thinking() -> Self {
        Self {
            response_mime_type: None,
            response_schema: None,
            thinking_config: ThinkingConfig { thinking_budget: 0 },
        }
    }

    /// Thinking disabled, response constrained to the ASCII-art schema
    fn art_schema() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(serde_json::json!({
                "type": "OBJECT",
                "properties": {
                    "art": {
                        "type": "STRING",
                        "description": "The ASCII art visualization as a single string \
                                        with newline characters for line breaks.",
                    },
                },
                "required": ["art"],
            })),
            thinking_config: ThinkingConfig { thinking_budget: 0 },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .and_then(|mut candidates| {
                if candidates.is_empty() {
                    None
                } else {
                    Some(candidates.remove(0))
                }
            })
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = GeminiClient::new(GeminiConfig::new("k"));
        assert_eq!(
            client.generate_url("gemini-2.5-flash", "k"),
            format!("{BASE_URL}/gemini-2.5-flash:generateContent?key=k")
        );
        assert!(client
            .stream_url("gemini-2.5-flash", "k")
            .contains(":streamGenerateContent?alt=sse"));
    }

    #[test]
    fn test_definition_prompt_names_topic() {
        let prompt = definition_prompt("gossamer");
        assert!(prompt.contains("\"gossamer\""));
        assert!(prompt.contains("single-paragraph"));
    }

    #[test]
    fn test_sse_payload() {
        assert_eq!(sse_payload("data: {\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(sse_payload("data:"), None);
        assert_eq!(sse_payload("data: [DONE]"), None);
        assert_eq!(sse_payload(": keepalive"), None);
        assert_eq!(sse_payload(""), None);
    }

    #[test]
    fn test_art_schema_serialization() {
        let config = GenerationConfig::art_schema();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["responseMimeType"], "application/json");
        assert_eq!(json["responseSchema"]["required"][0], "art");
        assert_eq!(json["thinkingConfig"]["thinkingBudget"], 0);
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(api_error_message(body), "RESOURCE_EXHAUSTED: quota exceeded");
        assert_eq!(api_error_message("not json"), "not json");
    }

    #[test]
    fn test_chunk_text_extraction() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"A tide is"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.first_text(), Some("A tide is".to_string()));

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_text(), None);
    }

    #[tokio::test]
    async fn test_unconfigured_short_circuits() {
        let client = GeminiClient::new(GeminiConfig::unconfigured());

        let mut rx = client.stream_definition("ocean").await;
        assert_eq!(
            rx.recv().await,
            Some(StreamChunk::Failed(UNCONFIGURED_MESSAGE.to_string()))
        );

        let err = client.random_word().await.unwrap_err();
        assert!(err.to_string().contains(UNCONFIGURED_MESSAGE));

        let err = client.ascii_art("ocean").await.unwrap_err();
        assert!(err.to_string().contains(UNCONFIGURED_MESSAGE));
    }
}
