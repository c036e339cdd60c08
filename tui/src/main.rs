//! Wordrift TUI Entry Point
//!
//! Launches the terminal UI for wordrift, an interactive word explorer.
//!
//! Environment:
//!   GEMINI_API_KEY          API key (falls back to API_KEY)
//!   WORDRIFT_TEXT_MODEL     Model for definitions and random words
//!   WORDRIFT_ART_MODEL      Model for ASCII art
//!   WORDRIFT_SEED_TOPIC     Topic submitted on startup

use std::io;
use std::panic;
use std::sync::Arc;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordrift_core::{GeminiClient, GeminiConfig};
use wordrift_tui::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up logging. Stderr keeps the alternate screen clean; redirect it
    // to a file when debugging (RUST_LOG=debug wordrift 2>wordrift.log).
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: wordrift requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  - Running in a non-interactive environment (CI, container)");
        eprintln!("  - SSH without -t flag");
        eprintln!("  - Piped stdin/stdout");
        std::process::exit(1);
    }

    let config = GeminiConfig::from_env();
    let seed_topic = config.seed_topic.clone();
    let backend = Arc::new(GeminiClient::new(config));

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(backend, seed_topic);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}
