//! Definition Layout
//!
//! Turns the accumulated definition text into positioned spans for the
//! interactive render: word tokens become clickable spans with a recorded
//! column, whitespace stays inert and verbatim, and lines wrap at word
//! boundaries. The app uses the positions for mouse hit-testing and the
//! interactive indices for keyboard selection.
//!
//! Streaming-mode rendering does not come through here; while text is
//! still arriving it is wrapped as one inert block (see `App`).

use unicode_width::UnicodeWidthStr;
use wordrift_core::{is_topic_match, tokenize, Token};

/// What a laid-out span is
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpanKind {
    /// Whitespace or pure punctuation; rendered verbatim, never clickable
    Inert,
    /// A clickable word
    Word {
        /// Position among the interactive spans, in reading order
        interactive_index: usize,
        /// Click payload: the word with edge punctuation stripped
        clean: String,
        /// Whether this word matches the current topic
        is_current_topic: bool,
    },
}

/// One positioned span of definition text
#[derive(Clone, Debug)]
pub struct LaidSpan {
    /// Column within the line
    pub x: u16,
    /// The raw text, punctuation and spacing included
    pub text: String,
    pub kind: SpanKind,
}

/// One wrapped line
#[derive(Clone, Debug, Default)]
pub struct LaidLine {
    pub spans: Vec<LaidSpan>,
}

/// The full interactive layout for one render pass
#[derive(Clone, Debug, Default)]
pub struct DefinitionLayout {
    pub lines: Vec<LaidLine>,
    /// Number of interactive spans across all lines
    pub word_count: usize,
}

impl DefinitionLayout {
    /// The clean payload of the interactive span at `index`
    pub fn payload(&self, index: usize) -> Option<&str> {
        self.lines.iter().flat_map(|l| l.spans.iter()).find_map(|span| match &span.kind {
            SpanKind::Word {
                interactive_index,
                clean,
                ..
            } if *interactive_index == index => Some(clean.as_str()),
            _ => None,
        })
    }
}

/// Lay out `content` for interactive rendering at the given width.
///
/// Tokens are recomputed from the content on every pass; the layout is a
/// derived view and is never stored across renders.
pub fn layout_interactive(content: &str, topic: &str, width: u16) -> DefinitionLayout {
    let width = width.max(1) as usize;
    let mut lines = vec![LaidLine::default()];
    let mut x = 0usize;
    let mut word_count = 0usize;

    for token in tokenize(content) {
        match token {
            Token::Whitespace(ws) => {
                for (i, segment) in ws.split('\n').enumerate() {
                    if i > 0 {
                        lines.push(LaidLine::default());
                        x = 0;
                    }
                    if segment.is_empty() || x >= width {
                        continue;
                    }
                    // Clamp trailing whitespace to the line width
                    let fit: String = segment.chars().take(width - x).collect();
                    let w = fit.width();
                    push_span(&mut lines, x, fit, SpanKind::Inert);
                    x += w;
                }
            }
            Token::Word { raw, clean } => {
                let w = raw.width();
                if x > 0 && x + w > width {
                    lines.push(LaidLine::default());
                    x = 0;
                }
                let kind = if clean.is_empty() {
                    SpanKind::Inert
                } else {
                    let kind = SpanKind::Word {
                        interactive_index: word_count,
                        is_current_topic: is_topic_match(&clean, topic),
                        clean,
                    };
                    word_count += 1;
                    kind
                };
                push_span(&mut lines, x, raw, kind);
                x += w;
            }
        }
    }

    DefinitionLayout { lines, word_count }
}

fn push_span(lines: &mut Vec<LaidLine>, x: usize, text: String, kind: SpanKind) {
    lines
        .last_mut()
        .expect("layout always has a current line")
        .spans
        .push(LaidSpan {
            x: x as u16,
            text,
            kind,
        });
}
