// Metrics panel
//
// Formats the health metrics of the current snapshot and renders them next
// to the topology canvas.

use crate::app::AppState;
use crate::theme::{ACCENT, ACTIVE_NODE, DANGER, TEXT, WARNING};
use crate::topology::Snapshot;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Packet loss above this percentage is highlighted as a warning
const PACKET_LOSS_WARN: f64 = 1.0;

/// Packet loss above this percentage is highlighted as critical
const PACKET_LOSS_CRIT: f64 = 5.0;

/// Display strings derived from one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsView {
    pub packet_loss: String,
    pub jitter: String,
    pub packet_loss_pct: f64,
    pub nodes: usize,
    pub links: usize,
    pub mean_latency: Option<String>,
}

impl MetricsView {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            packet_loss: format_packet_loss(snapshot.metrics.packet_loss),
            jitter: format_jitter(snapshot.metrics.jitter),
            packet_loss_pct: snapshot.metrics.packet_loss,
            nodes: snapshot.nodes.len(),
            links: snapshot.edges.len(),
            mean_latency: snapshot
                .mean_link_latency()
                .map(|ms| format!("Mean Link Latency: {:.2} ms", ms)),
        }
    }
}

/// `Packet Loss: 2.50%`
pub fn format_packet_loss(percent: f64) -> String {
    format!("Packet Loss: {:.2}%", percent)
}

/// `Jitter: 10.00 ms`
pub fn format_jitter(ms: f64) -> String {
    format!("Jitter: {:.2} ms", ms)
}

fn packet_loss_color(percent: f64) -> ratatui::style::Color {
    if percent >= PACKET_LOSS_CRIT {
        DANGER
    } else if percent >= PACKET_LOSS_WARN {
        WARNING
    } else {
        ACTIVE_NODE
    }
}

pub fn render_metrics(f: &mut Frame, area: Rect, app: &AppState) {
    let lines = match &app.view.metrics {
        Some(view) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    view.packet_loss.clone(),
                    Style::default()
                        .fg(packet_loss_color(view.packet_loss_pct))
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(view.jitter.clone(), Style::default().fg(TEXT))),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Nodes: ", Style::default().fg(ACCENT)),
                    Span::raw(view.nodes.to_string()),
                    Span::styled("  Links: ", Style::default().fg(ACCENT)),
                    Span::raw(view.links.to_string()),
                ]),
            ];
            if let Some(latency) = &view.mean_latency {
                lines.push(Line::from(Span::styled(latency.clone(), Style::default().fg(TEXT))));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "Waiting for first snapshot...",
            Style::default().fg(TEXT).add_modifier(Modifier::ITALIC),
        ))],
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Metrics ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(panel, area);
}
