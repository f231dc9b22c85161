// UI rendering module
//
// This module contains all UI rendering components for topowatch.
// The main draw() function orchestrates rendering of all UI panels.

mod controls;
pub mod metrics;
mod status_bar;
mod topology_map;

use crate::app::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use controls::{render_controls, render_notice};
use metrics::render_metrics;
use status_bar::render_status_bar;
use topology_map::render_topology_map;

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &AppState) {
    let size = f.area();

    // Main layout: body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    // Body: topology map + right panels
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(68), // Topology map
            Constraint::Percentage(32), // Right panels
        ])
        .split(chunks[0]);

    render_topology_map(f, body_chunks[0], app);

    // Right side: Metrics + Actions
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Metrics
            Constraint::Min(7),    // Actions
        ])
        .split(body_chunks[1]);

    render_metrics(f, right_chunks[0], app);
    render_controls(f, right_chunks[1], app);

    render_status_bar(f, chunks[1], app);

    // Popup goes last so it covers everything else
    if let Some(notice) = &app.view.notice {
        render_notice(f, size, notice);
    }
}
