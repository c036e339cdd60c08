//! Main Application
//!
//! The App struct manages the TUI lifecycle:
//! - Event loop (keyboard, mouse, resize) via `tokio::select!`
//! - Explorer for orchestration (submission, streaming, history)
//! - Rendering with per-span hit rects for mouse pivoting
//!
//! Streaming chunks are handled reactively: each chunk arriving on the
//! explorer's channel triggers an immediate re-render rather than waiting
//! for the next frame tick.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

use wordrift_core::{
    generate_ascii_art, ArtError, AsciiArt, Explorer, GenBackend, SessionStatus,
};

use crate::layout::{layout_interactive, SpanKind};
use crate::theme;

/// Frame tick (10 FPS is plenty; streaming renders happen immediately)
const FRAME_DURATION: Duration = Duration::from_millis(100);

/// Frames per blink phase of the streaming cursor (~500 ms)
const BLINK_FRAMES: u64 = 5;

/// Width of the art panel when visible
const ART_PANEL_WIDTH: u16 = 34;

/// Which panel keyboard input is directed at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Focus {
    Input,
    Words,
    History,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Input => Focus::Words,
            Focus::Words => Focus::History,
            Focus::History => Focus::Input,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Input => Focus::History,
            Focus::Words => Focus::Input,
            Focus::History => Focus::Words,
        }
    }
}

/// Results arriving from spawned side tasks
enum SideEvent {
    RandomWord(anyhow::Result<String>),
    Art {
        topic: String,
        result: Result<AsciiArt, ArtError>,
    },
}

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Orchestration core
    explorer: Explorer,
    /// Topic to submit on startup, if any
    seed_topic: Option<String>,

    // === Side-task plumbing ===
    side_tx: mpsc::Sender<SideEvent>,
    side_rx: mpsc::Receiver<SideEvent>,

    // === Input State ===
    input_buffer: String,
    /// Cursor position within input buffer (char index)
    cursor_pos: usize,
    focus: Focus,
    /// Selected interactive word (index in reading order)
    selected_word: usize,
    /// Selected history chip
    selected_chip: usize,
    /// Scroll offset into the definition (lines from top)
    scroll_offset: usize,
    /// Total laid-out definition lines (for scroll bounds)
    total_lines: usize,
    /// Interactive word count of the last laid-out definition
    word_total: usize,

    // === Art Panel ===
    show_art: bool,
    art: Option<AsciiArt>,
    art_loading: bool,

    // === Render State ===
    /// Transient message in the status bar (random word / art failures)
    notice: Option<String>,
    /// Frame counter, drives the streaming cursor blink
    frames: u64,
    /// Hit rects for interactive words, rebuilt every render
    word_hits: Vec<(Rect, String)>,
    /// Hit rects for history chips, rebuilt every render
    chip_hits: Vec<(Rect, String)>,
}

impl App {
    /// Create a new App over the given backend
    pub fn new(backend: Arc<dyn GenBackend>, seed_topic: Option<String>) -> Self {
        let (side_tx, side_rx) = mpsc::channel(16);
        Self {
            running: true,
            explorer: Explorer::new(backend),
            seed_topic,
            side_tx,
            side_rx,
            input_buffer: String::new(),
            cursor_pos: 0,
            focus: Focus::Input,
            selected_word: 0,
            selected_chip: 0,
            scroll_offset: 0,
            total_lines: 0,
            word_total: 0,
            show_art: false,
            art: None,
            art_loading: false,
            notice: None,
            frames: 0,
            word_hits: Vec::new(),
            chip_hits: Vec::new(),
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        if let Some(seed) = self.seed_topic.take() {
            self.submit_topic(seed).await;
        }

        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key).await;
                            }
                            Event::Mouse(mouse) => self.handle_mouse(mouse).await,
                            _ => {}
                        }
                    }
                }

                // Streaming chunks are applied and rendered immediately
                chunk = self.explorer.next_chunk() => {
                    let (ticket, chunk) = chunk;
                    self.explorer.apply(ticket, chunk);
                }

                // Side-task results (random word, art)
                Some(side) = self.side_rx.recv() => {
                    self.handle_side_event(side).await;
                }

                // Frame tick for the cursor blink
                _ = tokio::time::sleep(FRAME_DURATION) => {
                    self.frames += 1;
                }
            }

            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    /// Submit a topic from any source: input box, word pivot, history
    /// chip, or the random-word task.
    async fn submit_topic(&mut self, topic: impl Into<String>) {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return;
        }

        self.scroll_offset = 0;
        self.selected_word = 0;
        self.notice = None;
        self.explorer.submit(topic).await;

        if self.show_art {
            self.request_art();
        }
    }

    /// Spawn a random-word request
    fn request_random(&mut self) {
        let backend = self.explorer.backend();
        let tx = self.side_tx.clone();
        tokio::spawn(async move {
            let result = backend.random_word().await;
            let _ = tx.send(SideEvent::RandomWord(result)).await;
        });
    }

    /// Spawn an art request for the current topic
    fn request_art(&mut self) {
        let topic = self.explorer.session().topic.clone();
        if topic.is_empty() {
            return;
        }
        let backend = self.explorer.backend();
        let tx = self.side_tx.clone();
        self.art = None;
        self.art_loading = true;
        tokio::spawn(async move {
            let result = generate_ascii_art(backend.as_ref(), &topic).await;
            let _ = tx.send(SideEvent::Art { topic, result }).await;
        });
    }

    async fn handle_side_event(&mut self, event: SideEvent) {
        match event {
            SideEvent::RandomWord(Ok(word)) => {
                self.submit_topic(word).await;
            }
            SideEvent::RandomWord(Err(e)) => {
                self.notice = Some(format!("Random word failed: {e}"));
            }
            SideEvent::Art { topic, result } => {
                // Art for a superseded topic is not applied
                if topic != self.explorer.session().topic {
                    tracing::debug!(%topic, "dropping art for superseded topic");
                    return;
                }
                self.art_loading = false;
                match result {
                    Ok(art) => self.art = Some(art),
                    Err(e) => self.notice = Some(e.to_string()),
                }
            }
        }
    }

    /// Handle keyboard input
    async fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
                return;
            }

            // Global shortcuts (must come before plain Char)
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.request_random();
                return;
            }
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.show_art = !self.show_art;
                if self.show_art && self.art.is_none() && !self.art_loading {
                    self.request_art();
                }
                return;
            }

            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return;
            }

            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(5);
                return;
            }
            KeyCode::PageDown => {
                self.scroll_offset = (self.scroll_offset + 5).min(self.max_scroll());
                return;
            }

            _ => {}
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key).await,
            Focus::Words => self.handle_words_key(key).await,
            Focus::History => self.handle_history_key(key).await,
        }
    }

    async fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if !self.input_buffer.is_empty() {
                    let topic = std::mem::take(&mut self.input_buffer);
                    self.cursor_pos = 0;
                    self.submit_topic(topic).await;
                }
            }
            KeyCode::Char(c) => {
                let byte_pos = self
                    .input_buffer
                    .char_indices()
                    .nth(self.cursor_pos)
                    .map(|(i, _)| i)
                    .unwrap_or(self.input_buffer.len());
                self.input_buffer.insert(byte_pos, c);
                self.cursor_pos += 1;
            }
            KeyCode::Backspace => {
                if self.cursor_pos > 0 {
                    let byte_pos = self
                        .input_buffer
                        .char_indices()
                        .nth(self.cursor_pos - 1)
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    self.input_buffer.remove(byte_pos);
                    self.cursor_pos -= 1;
                }
            }
            KeyCode::Delete => {
                let char_count = self.input_buffer.chars().count();
                if self.cursor_pos < char_count {
                    let byte_pos = self
                        .input_buffer
                        .char_indices()
                        .nth(self.cursor_pos)
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    self.input_buffer.remove(byte_pos);
                }
            }
            KeyCode::Left => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
            }
            KeyCode::Right => {
                let char_count = self.input_buffer.chars().count();
                if self.cursor_pos < char_count {
                    self.cursor_pos += 1;
                }
            }
            KeyCode::Home => self.cursor_pos = 0,
            KeyCode::End => self.cursor_pos = self.input_buffer.chars().count(),
            _ => {}
        }
    }

    async fn handle_words_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => {
                self.selected_word = self.selected_word.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.word_total > 0 && self.selected_word + 1 < self.word_total {
                    self.selected_word += 1;
                }
            }
            KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::Down => {
                self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll());
            }
            KeyCode::Enter => {
                if let Some(payload) = self.selected_payload() {
                    self.submit_topic(payload).await;
                }
            }
            _ => {}
        }
    }

    async fn handle_history_key(&mut self, key: KeyEvent) {
        let count = self.explorer.history().len();
        match key.code {
            KeyCode::Left => {
                self.selected_chip = self.selected_chip.saturating_sub(1);
            }
            KeyCode::Right => {
                if count > 0 && self.selected_chip + 1 < count {
                    self.selected_chip += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(topic) = self.explorer.history().get(self.selected_chip) {
                    // Same downstream effect as submitting the topic fresh
                    self.submit_topic(topic.to_string()).await;
                }
            }
            _ => {}
        }
    }

    /// Handle mouse input
    async fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(3);
            }
            MouseEventKind::ScrollDown => {
                self.scroll_offset = (self.scroll_offset + 3).min(self.max_scroll());
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(mouse.column, mouse.row);
                let hit = self
                    .word_hits
                    .iter()
                    .chain(self.chip_hits.iter())
                    .find(|(rect, _)| rect.contains(position))
                    .map(|(_, payload)| payload.clone());
                if let Some(payload) = hit {
                    self.submit_topic(payload).await;
                }
            }
            _ => {}
        }
    }

    fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(1)
    }

    /// Clean payload of the currently selected word
    fn selected_payload(&self) -> Option<String> {
        let session = self.explorer.session();
        if !session.is_interactive() {
            return None;
        }
        // Recompute from text: hit rects only cover visible words
        let layout = layout_interactive(&session.text, &session.topic, u16::MAX);
        layout.payload(self.selected_word).map(str::to_string)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.word_hits.clear();
        self.chip_hits.clear();

        let (main, art_area) = if self.show_art && area.width > ART_PANEL_WIDTH + 20 {
            let [main, art] =
                Layout::horizontal([Constraint::Min(20), Constraint::Length(ART_PANEL_WIDTH)])
                    .areas(area);
            (main, Some(art))
        } else {
            (area, None)
        };

        let [history_area, definition_area, input_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(main);

        self.render_history(frame, history_area);
        self.render_definition(frame, definition_area);
        self.render_input(frame, input_area);
        self.render_status(frame, status_area);
        if let Some(art_area) = art_area {
            self.render_art(frame, art_area);
        }
    }

    fn border_style(&self, focus: Focus) -> Style {
        if self.focus == focus {
            Style::default().fg(theme::BORDER_FOCUSED)
        } else {
            Style::default().fg(theme::BORDER)
        }
    }

    /// Render the history rail. An empty history still renders its
    /// container so the layout height stays stable.
    fn render_history(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title("history")
            .border_style(self.border_style(Focus::History));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 {
            return;
        }

        let topics = self.explorer.history().topics().to_vec();
        if !topics.is_empty() && self.selected_chip >= topics.len() {
            self.selected_chip = topics.len() - 1;
        }

        let mut spans = Vec::new();
        let mut x = inner.x;
        for (i, topic) in topics.iter().enumerate() {
            let chip = format!(" {topic} ");
            let chip_width = chip.width() as u16;
            if x + chip_width > inner.right() {
                break;
            }

            let mut style = Style::default().fg(theme::HISTORY_CHIP);
            if self.focus == Focus::History && i == self.selected_chip {
                style = style.add_modifier(Modifier::REVERSED);
            }
            self.chip_hits
                .push((Rect::new(x, inner.y, chip_width, 1), topic.clone()));
            spans.push(Span::styled(chip, style));
            spans.push(Span::raw(" "));
            x += chip_width + 1;
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn render_definition(&mut self, frame: &mut Frame, area: Rect) {
        let session = self.explorer.session();
        let title = if session.topic.is_empty() {
            "wordrift".to_string()
        } else {
            session.topic.clone()
        };

        let block = Block::bordered()
            .title(title)
            .border_style(self.border_style(Focus::Words));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        match session.status {
            SessionStatus::Idle => {
                self.total_lines = 0;
            }
            SessionStatus::Loading => self.render_streaming(frame, inner),
            SessionStatus::Ready | SessionStatus::Errored => {
                self.render_interactive(frame, inner);
            }
        }
    }

    /// Streaming mode: one inert block plus a blinking cursor marker. No
    /// tokenization, no click targets - the content is not stable yet.
    fn render_streaming(&mut self, frame: &mut Frame, inner: Rect) {
        let text = self.explorer.session().text.clone();
        let wrapped = textwrap::wrap(&text, inner.width.max(1) as usize);

        let cursor_on = (self.frames / BLINK_FRAMES) % 2 == 0;
        let cursor = if cursor_on {
            Span::styled("▌", Style::default().fg(theme::STREAMING_CURSOR))
        } else {
            Span::raw(" ")
        };

        let body_style = Style::default().fg(theme::BODY_TEXT);
        let mut lines: Vec<Line> = wrapped
            .iter()
            .map(|l| Line::from(Span::styled(l.to_string(), body_style)))
            .collect();
        match lines.last_mut() {
            Some(last) => last.spans.push(cursor),
            None => lines.push(Line::from(cursor)),
        }

        self.total_lines = lines.len();
        self.clamp_scroll(inner.height);

        // Keep the newest text in view while streaming
        let scroll = self.total_lines.saturating_sub(inner.height as usize);
        frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
    }

    /// Interactive mode: tokenize the final text and render every word as
    /// a click target, recording hit rects for the mouse.
    fn render_interactive(&mut self, frame: &mut Frame, inner: Rect) {
        let session = self.explorer.session();
        let layout = layout_interactive(&session.text, &session.topic, inner.width);

        self.word_total = layout.word_count;
        if layout.word_count > 0 && self.selected_word >= layout.word_count {
            self.selected_word = layout.word_count - 1;
        }

        self.total_lines = layout.lines.len();
        self.clamp_scroll(inner.height);
        let scroll = self.scroll_offset;

        let mut lines: Vec<Line> = Vec::with_capacity(layout.lines.len());
        for (line_idx, laid) in layout.lines.iter().enumerate() {
            let mut spans = Vec::with_capacity(laid.spans.len());
            for span in &laid.spans {
                let style = match &span.kind {
                    SpanKind::Inert => Style::default().fg(theme::BODY_TEXT),
                    SpanKind::Word {
                        interactive_index,
                        clean,
                        is_current_topic,
                    } => {
                        let visible = line_idx >= scroll
                            && (line_idx - scroll) < inner.height as usize;
                        if visible {
                            let rect = Rect::new(
                                inner.x + span.x,
                                inner.y + (line_idx - scroll) as u16,
                                span.text.width() as u16,
                                1,
                            );
                            self.word_hits.push((rect, clean.clone()));
                        }

                        let mut style = if *is_current_topic {
                            Style::default()
                                .fg(theme::CURRENT_TOPIC)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                                .fg(theme::WORD_LINK)
                                .add_modifier(Modifier::UNDERLINED)
                        };
                        if self.focus == Focus::Words
                            && *interactive_index == self.selected_word
                        {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        style
                    }
                };
                spans.push(Span::styled(span.text.clone(), style));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
    }

    fn render_input(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title("topic")
            .border_style(self.border_style(Focus::Input));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 {
            return;
        }

        // Insert the cursor marker at the char position
        let chars: Vec<char> = self.input_buffer.chars().collect();
        let cursor_pos = self.cursor_pos.min(chars.len());
        let (before, after) = chars.split_at(cursor_pos);
        let before: String = before.iter().collect();
        let after: String = after.iter().collect();

        let line = Line::from(vec![
            Span::styled("> ", Style::default().fg(theme::STATUS_TEXT)),
            Span::styled(before, Style::default().fg(theme::BODY_TEXT)),
            Span::styled("▏", Style::default().fg(theme::STREAMING_CURSOR)),
            Span::styled(after, Style::default().fg(theme::BODY_TEXT)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_status(&mut self, frame: &mut Frame, area: Rect) {
        let state = match self.explorer.session().status {
            SessionStatus::Idle => "type a topic, or Ctrl+R for a random one",
            SessionStatus::Loading => "streaming...",
            SessionStatus::Ready => "ready - click a word to pivot",
            SessionStatus::Errored => "errored",
        };

        let mut spans = vec![Span::styled(
            format!(" {state}"),
            Style::default().fg(theme::STATUS_TEXT),
        )];
        if let Some(notice) = &self.notice {
            spans.push(Span::styled(
                format!("  {notice}"),
                Style::default().fg(theme::NOTICE),
            ));
        }
        spans.push(Span::styled(
            "  |  Tab focus · Ctrl+R random · Ctrl+A art · Esc quit",
            Style::default().fg(theme::STATUS_TEXT),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_art(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title("art")
            .border_style(Style::default().fg(theme::BORDER));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let style = Style::default().fg(theme::ART_TEXT);
        let lines: Vec<Line> = if self.art_loading {
            vec![Line::from(Span::styled("generating...", style))]
        } else if let Some(art) = &self.art {
            let mut lines: Vec<Line> = art
                .art
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), style)))
                .collect();
            if let Some(caption) = &art.text {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    caption.clone(),
                    Style::default().fg(theme::STATUS_TEXT),
                )));
            }
            lines
        } else {
            vec![Line::from(Span::styled(
                "Ctrl+A regenerates",
                Style::default().fg(theme::STATUS_TEXT),
            ))]
        };

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn clamp_scroll(&mut self, height: u16) {
        let max = self.total_lines.saturating_sub(height as usize);
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
    }
}
