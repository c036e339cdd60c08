//! Wordrift TUI - Terminal interface for wordrift
//!
//! A full-screen terminal UI for rabbit-holing through word definitions.
//! All orchestration lives in `wordrift-core`; this crate only renders
//! state and translates terminal events into core operations.
//!
//! - **App**: Event loop and rendering
//! - **Layout**: Token-to-positioned-span layout for the interactive view
//! - **Theme**: Color constants
//!
//! ## Event Flow
//!
//! ```text
//! Terminal Events -> App -> Explorer -> StreamChunk -> Session -> Render
//! ```

pub mod app;
pub mod layout;
pub mod theme;

pub use app::App;
