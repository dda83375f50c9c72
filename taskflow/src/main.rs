//! `TaskFlow`: terminal front end for the TaskFlow task tracker.
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/taskflow/config.toml`).
//!
//! ```bash
//! # Against a local API
//! cargo run --bin taskflow
//!
//! # Against another deployment, keeping the session somewhere else
//! cargo run --bin taskflow -- --api-url https://tasks.example.com \
//!     --session-file /tmp/taskflow-session.toml
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use taskflow::app::App;
use taskflow::config::{CliArgs, ClientConfig};
use taskflow::gateway::Gateway;
use taskflow::session::FileStore;
use taskflow::transport::http::HttpTransport;
use taskflow::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    // A broken config file is fatal: falling back to defaults would also
    // drop the CLI and env overrides.
    let config = ClientConfig::load(&cli).map_err(|e| {
        eprintln!("Error: {e}");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(api_url = %config.api_url, "taskflow starting");

    let transport = HttpTransport::new(&config.api_url)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .with_user_agent(&config.user_agent);
    let session_path = config
        .session_path()
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    let store = Arc::new(FileStore::open(session_path));
    let gateway = Arc::new(Gateway::new(transport, store));

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, gateway, &config);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskflow exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskflow.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(log_filter(level))
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Filter built from `--log-level` / `TASKFLOW_LOG` only; `RUST_LOG` is not
/// consulted. An unparsable level falls back to `info`.
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Main application loop.
///
/// Runs inside the tokio runtime so controllers can spawn their request
/// tasks; completions are applied on each pass through [`App::tick`].
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    gateway: Arc<Gateway<HttpTransport, FileStore>>,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new(gateway, config.event_buffer);
    app.start();

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Apply request completions that arrived since the last pass.
        app.tick();

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key_event(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
