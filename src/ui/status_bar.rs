// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts and refresh
// indicators: backend, interval, snapshot age, and the last fetch error.

use crate::app::config::DEFAULT_REFRESH_MS;
use crate::app::AppState;
use crate::theme::{refresh_color, ACCENT, DANGER, TEXT, WARNING};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use std::time::Duration;

/// Short human-readable age: `3s`, `2m 05s`
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    // Calculate available width for hints (subtract borders)
    let available_width = area.width.saturating_sub(4);

    // Define all hints with priority levels
    struct Hint {
        priority: u8,
        key: &'static str,
        desc: &'static str,
        color: Color,
    }

    let hints = [
        Hint {
            priority: 1,
            key: "Esc:",
            desc: "Quit | ",
            color: DANGER,
        },
        Hint {
            priority: 1,
            key: "Tab:",
            desc: "Field | ",
            color: ACCENT,
        },
        Hint {
            priority: 2,
            key: "F5:",
            desc: "Refresh | ",
            color: ACCENT,
        },
        Hint {
            priority: 2,
            key: "↑↓:",
            desc: "Interval | ",
            color: ACCENT,
        },
    ];

    let mut spans = vec![Span::raw(" ")];
    let mut current_length = 1;

    // Process hints by priority
    for priority in 1..=2 {
        for hint in hints.iter().filter(|h| h.priority == priority) {
            let hint_length = hint.key.chars().count() + hint.desc.len();
            if current_length + hint_length <= available_width as usize {
                spans.push(Span::styled(
                    hint.key,
                    Style::default().fg(hint.color).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(hint.desc));
                current_length += hint_length;
            }
        }
    }

    spans.extend(build_refresh_indicators(app));

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(ACCENT)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

/// Build the refresh status spans
///
/// `[url] [every 5000ms] [#3 2s ago] [2 dangling links] [error: ...]`
pub fn build_refresh_indicators(app: &AppState) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let bracket = Style::default().fg(TEXT);

    spans.push(Span::styled(format!("[{}] ", app.backend_url), bracket));

    let interval_ms = app.refresh_config.refresh_ms;
    let mut interval_style = Style::default().fg(refresh_color(interval_ms, DEFAULT_REFRESH_MS));
    if app.refresh_config.recently_changed() {
        interval_style = interval_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    spans.push(Span::styled("[every ", bracket));
    spans.push(Span::styled(format!("{}ms", interval_ms), interval_style));
    spans.push(Span::styled("] ", bracket));

    let store = app.pipeline.store();
    let age = match (store.applied_seq(), store.applied_at()) {
        (Some(seq), Some(at)) => format!("[#{} {} ago] ", seq, format_age(at.elapsed())),
        _ => "[no snapshot yet] ".to_string(),
    };
    spans.push(Span::styled(age, bracket));

    let skipped = app.pipeline.last_report().skipped_edges.len();
    if skipped > 0 {
        spans.push(Span::styled(
            format!("[{} dangling links] ", skipped),
            Style::default().fg(WARNING),
        ));
    }

    if let Some(err) = app.pipeline.last_error() {
        spans.push(Span::styled(
            format!("[error: {}]", err),
            Style::default().fg(DANGER).add_modifier(Modifier::BOLD),
        ));
    }

    spans
}
