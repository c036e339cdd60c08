//! Theme and Colors
//!
//! Wordrift's palette: quiet paper-like body text with cyan interactive
//! words, so the clickable surface is obvious at a glance.

use ratatui::style::Color;

/// Plain definition text and inert punctuation
pub const BODY_TEXT: Color = Color::Rgb(220, 215, 200);

/// Clickable words
pub const WORD_LINK: Color = Color::Cyan;

/// The word matching the current topic
pub const CURRENT_TOPIC: Color = Color::Rgb(255, 200, 90);

/// Streaming cursor marker
pub const STREAMING_CURSOR: Color = Color::Rgb(120, 220, 160);

/// History chips
pub const HISTORY_CHIP: Color = Color::Rgb(160, 150, 220);

/// Panel borders
pub const BORDER: Color = Color::Rgb(90, 90, 100);

/// Border of the focused panel
pub const BORDER_FOCUSED: Color = Color::Cyan;

/// Status bar text
pub const STATUS_TEXT: Color = Color::DarkGray;

/// Transient error notices
pub const NOTICE: Color = Color::Rgb(255, 100, 100);

/// ASCII art body
pub const ART_TEXT: Color = Color::Rgb(150, 200, 255);
