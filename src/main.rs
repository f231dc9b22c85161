// topowatch - live network topology viewer
// Polls a network simulation backend and draws its topology in the terminal

mod app;
mod net;
mod pipeline;
mod render;
mod theme;
mod topology;
mod ui;

use anyhow::{Context, Result};
use app::config::{Args, RefreshConfig};
use app::event::{handle_key_event, Command};
use app::{AppEvent, AppState};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use net::HttpBackend;
use pipeline::actions::ActionOutcome;
use pipeline::schedule::RefreshHandle;
use pipeline::Pipeline;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::future::Future;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedSender};
use topology::layout::LayoutConfig;
use tracing_subscriber::EnvFilter;

/// Send diagnostics to a file; the terminal belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("topowatch=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Start logging only when there is a terminal to run in
///
/// Returns `false` without touching the log file otherwise.
fn prepare_session(is_terminal: bool, log_file: &Path) -> Result<bool> {
    if !is_terminal {
        return Ok(false);
    }
    init_logging(log_file)?;
    Ok(true)
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if !prepare_session(io::stdout().is_terminal(), &args.log_file)? {
        eprintln!("topowatch requires a real terminal.");
        return Ok(());
    }

    let backend = Arc::new(
        HttpBackend::new(&args.url)
            .with_context(|| format!("cannot create backend client for {}", args.url))?,
    );
    tracing::info!(url = backend.base_url(), refresh_ms = args.refresh_ms, "Starting topowatch");

    let mut app = AppState::new(
        backend.base_url().to_string(),
        Pipeline::new(backend, LayoutConfig::default()),
        RefreshConfig::new(args.refresh_ms),
    );

    // First snapshot before the alternate screen, so a slow backend shows up as a plain line
    eprintln!("Connecting to {} ...", app.backend_url);
    app.pipeline.refresh(&mut app.view).await;

    let mut terminal = setup_terminal()?;
    let res = run_app(&mut terminal, app).await;
    restore_terminal(&mut terminal)?;

    if let Err(err) = &res {
        tracing::error!(error = %err, "Exiting with error");
    }
    res
}

fn spawn_fetch(app: &mut AppState, tx: &UnboundedSender<AppEvent>) {
    let fetch = app.pipeline.begin_fetch();
    let tx = tx.clone();
    tokio::spawn(async move {
        // Closed channel means the loop is shutting down
        let _ = tx.send(AppEvent::Fetched(fetch.await));
    });
}

fn spawn_action<F>(request: F, tx: &UnboundedSender<AppEvent>)
where
    F: Future<Output = ActionOutcome> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(AppEvent::ActionDone(request.await));
    });
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: AppState,
) -> Result<()> {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut schedule = RefreshHandle::start(app.refresh_config.interval(), tick_tx.clone(), ());
    let mut events = EventStream::new();

    while app.running {
        terminal.draw(|f| ui::draw(f, &app))?;

        tokio::select! {
            Some(()) = tick_rx.recv() => spawn_fetch(&mut app, &event_tx),
            Some(event) = event_rx.recv() => {
                if app.handle_app_event(event) {
                    spawn_fetch(&mut app, &event_tx);
                }
            }
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => match handle_key_event(&mut app, key) {
                    Command::Refresh => spawn_fetch(&mut app, &event_tx),
                    Command::FailNode => {
                        if let Some(request) = app.prepare_fail_node() {
                            spawn_action(request, &event_tx);
                        }
                    }
                    Command::FindPath => {
                        if let Some(request) = app.prepare_find_path() {
                            spawn_action(request, &event_tx);
                        }
                    }
                    Command::Reschedule => {
                        let period = app.refresh_config.interval();
                        if period != schedule.period() || !schedule.is_running() {
                            schedule.stop();
                            schedule = RefreshHandle::start(period, tick_tx.clone(), ());
                        }
                    }
                    Command::Quit | Command::None => {}
                },
                // Resize and other events only need a redraw
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("terminal event stream failed"),
                None => break,
            }
        }
    }

    schedule.stop();
    Ok(())
}
