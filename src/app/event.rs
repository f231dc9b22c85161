// Keyboard event handling
//
// This module contains the keyboard event handler that updates the
// application state and tells the event loop what to do next.

use super::AppState;
use crate::pipeline::InputField;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Follow-up work for the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Nothing beyond the state change already made
    None,
    /// Exit the application
    Quit,
    /// Fetch a snapshot now
    Refresh,
    /// Send the fail-node request
    FailNode,
    /// Send the route query
    FindPath,
    /// Restart the refresh timer with the new interval
    Reschedule,
}

/// Handle keyboard events and update application state
///
/// # Key Bindings
/// - `Ctrl-C` - Quit
/// - `Esc` - Dismiss the message popup, or quit when none is shown
/// - `F5`, `Ctrl-R` - Refresh now
/// - `Tab` / `Shift-Tab` - Next / previous input field
/// - `Enter` - Run the action of the focused field
/// - `Up` / `Down` - Lengthen / shorten the refresh interval
/// - `Backspace` - Delete in the focused field
/// - any other character - Type into the focused field
pub fn handle_key_event(app: &mut AppState, key: KeyEvent) -> Command {
    if key.kind == KeyEventKind::Release {
        return Command::None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
        app.running = false;
        return Command::Quit;
    }

    // A popup swallows everything except its dismiss keys
    if app.view.notice.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            app.dismiss_notice();
        }
        return Command::None;
    }

    match key.code {
        KeyCode::Esc => {
            app.running = false;
            Command::Quit
        }
        KeyCode::F(5) => Command::Refresh,
        KeyCode::Char('r') | KeyCode::Char('R') if ctrl => Command::Refresh,
        KeyCode::Tab => {
            app.view.inputs.focus_next();
            Command::None
        }
        KeyCode::BackTab => {
            app.view.inputs.focus_prev();
            Command::None
        }
        KeyCode::Up => {
            app.refresh_config.slow_down();
            Command::Reschedule
        }
        KeyCode::Down => {
            app.refresh_config.speed_up();
            Command::Reschedule
        }
        KeyCode::Backspace => {
            app.view.inputs.backspace();
            Command::None
        }
        KeyCode::Enter => match app.view.inputs.focus {
            InputField::FailNode => Command::FailNode,
            InputField::Source | InputField::Target => Command::FindPath,
        },
        KeyCode::Char(c) if !ctrl => {
            app.view.inputs.push(c);
            Command::None
        }
        _ => Command::None,
    }
}
