//! Generation Backend
//!
//! Abstraction over the remote generation service plus the Gemini
//! implementation. The [`GenBackend`] trait lets the explorer run against a
//! substitute backend in tests.

pub mod gemini;
pub mod traits;

pub use gemini::GeminiClient;
pub use traits::{AsciiArt, GenBackend, StreamChunk};
