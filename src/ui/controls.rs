// Controls rendering module
//
// Renders the action input fields and the notice popup that shows the
// result of an action until dismissed.

use crate::app::{AppState, InputFields};
use crate::pipeline::{InputField, Notice, NoticeKind};
use crate::theme::{ACCENT, ACTIVE_NODE, DANGER, TEXT};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const FIELDS: [(InputField, &str); 3] = [
    (InputField::FailNode, "Fail node"),
    (InputField::Source, "Source"),
    (InputField::Target, "Target"),
];

/// Width of the focus marker plus the label column
const LABEL_WIDTH: usize = 12;

fn field_line(inputs: &InputFields, field: InputField, label: &str) -> Line<'static> {
    let focused = inputs.focus == field;
    let label_style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    };
    let marker = if focused { "▶" } else { " " };

    Line::from(vec![
        Span::styled(marker, Style::default().fg(ACCENT)),
        Span::styled(
            format!("{:<width$}", format!("{}: ", label), width = LABEL_WIDTH - 1),
            label_style,
        ),
        Span::raw(inputs.get(field).to_string()),
    ])
}

/// Terminal cell of the text cursor for the focused field
pub fn cursor_position(area: Rect, inputs: &InputFields) -> Position {
    let row = FIELDS
        .iter()
        .position(|(field, _)| *field == inputs.focus)
        .unwrap_or(0) as u16;
    let text_width = inputs.get(inputs.focus).width() as u16;
    // One cell for the border, then marker and label
    Position::new(
        area.x + 1 + LABEL_WIDTH as u16 + text_width,
        area.y + 1 + row,
    )
}

pub fn render_controls(f: &mut Frame, area: Rect, app: &AppState) {
    let inputs = &app.view.inputs;
    let mut lines: Vec<Line> = FIELDS
        .iter()
        .map(|(field, label)| field_line(inputs, *field, label))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(" on Fail node fails it, on Source/Target finds a route", Style::default().fg(TEXT)),
    ]));

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Actions ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);

    if app.view.notice.is_none() {
        f.set_cursor_position(cursor_position(area, inputs));
    }
}

/// Centered rectangle taking the given percentage of `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn render_notice(f: &mut Frame, area: Rect, notice: &Notice) {
    let (title, color) = match notice.kind {
        NoticeKind::Info => (" Result ", ACTIVE_NODE),
        NoticeKind::Failure => (" Error ", DANGER),
    };
    let popup = centered_rect(60, 25, area);

    let body = vec![
        Line::from(Span::styled(notice.text.clone(), Style::default().fg(color))),
        Line::from(""),
        Line::from(Span::styled(
            "Esc / Enter to close",
            Style::default().fg(TEXT).add_modifier(Modifier::ITALIC),
        )),
    ];
    let widget = Paragraph::new(body)
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(color)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup);
    f.render_widget(widget, popup);
}
