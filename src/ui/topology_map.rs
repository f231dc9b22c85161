// Topology map rendering module
//
// Paints the recorded Scene onto a Braille canvas. Scene coordinates are
// y-down surface units; the canvas is y-up, so every point is flipped
// against the surface height before drawing.

use crate::app::AppState;
use crate::render::Primitive;
use crate::theme::{ACCENT, TEXT};
use crate::topology::layout::Point;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
        Block, BorderType, Borders,
    },
    Frame,
};

/// Spacing between the concentric circles that fill a disc
const DISC_FILL_STEP: f64 = 2.0;

/// Convert a surface point to canvas coordinates
pub fn to_canvas(point: Point, surface_height: f64) -> (f64, f64) {
    (point.x, surface_height - point.y)
}

/// Radii of the circles drawn to fill a disc, outermost first
///
/// Always ends above zero so a tiny disc still gets one visible ring.
pub fn fill_radii(radius: f64) -> Vec<f64> {
    let mut radii = Vec::new();
    let mut r = radius;
    while r > 0.0 {
        radii.push(r);
        r -= DISC_FILL_STEP;
    }
    radii
}

fn paint_primitive(ctx: &mut Context<'_>, primitive: &Primitive, height: f64) {
    match primitive {
        Primitive::Line { from, to, color } => {
            let (x1, y1) = to_canvas(*from, height);
            let (x2, y2) = to_canvas(*to, height);
            ctx.draw(&CanvasLine {
                x1,
                y1,
                x2,
                y2,
                color: *color,
            });
        }
        Primitive::Disc {
            center,
            radius,
            fill,
            outline,
        } => {
            let (x, y) = to_canvas(*center, height);
            for r in fill_radii(*radius).into_iter().skip(1) {
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: r,
                    color: *fill,
                });
            }
            ctx.draw(&Circle {
                x,
                y,
                radius: *radius,
                color: *outline,
            });
        }
        Primitive::Text { at, text, color } => {
            let (x, y) = to_canvas(*at, height);
            ctx.print(x, y, Span::styled(text.clone(), Style::default().fg(*color)));
        }
    }
}

pub fn render_topology_map(f: &mut Frame, area: Rect, app: &AppState) {
    let layout = *app.pipeline.layout();
    let scene = &app.view.scene;
    let width = layout.width;
    let height = layout.height;

    let title = match app.pipeline.store().current() {
        Some(snapshot) => format!(" Topology ({} nodes) ", snapshot.nodes.len()),
        None => " Topology ".to_string(),
    };

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT)),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            if scene.is_empty() {
                let center = to_canvas(layout.center(), height);
                ctx.print(
                    center.0 - width / 8.0,
                    center.1,
                    Span::styled(
                        "No topology to show",
                        Style::default().fg(TEXT).add_modifier(Modifier::ITALIC),
                    ),
                );
                return;
            }

            // Edges sit on their own layer so discs cover line ends
            for primitive in scene.primitives() {
                if matches!(primitive, Primitive::Line { .. }) {
                    paint_primitive(ctx, primitive, height);
                }
            }
            ctx.layer();
            for primitive in scene.primitives() {
                if !matches!(primitive, Primitive::Line { .. }) {
                    paint_primitive(ctx, primitive, height);
                }
            }
        });

    f.render_widget(canvas, area);
}
