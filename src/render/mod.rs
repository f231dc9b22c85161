// Topology renderer
//
// Repaints a whole frame onto a drawing surface: clear, edges, nodes, then
// labels. The surface is abstract so the pipeline can be exercised without a
// terminal; `Scene` is the display list the terminal UI paints from.

use crate::app::config::{LABEL_OFFSET, NODE_RADIUS};
use crate::theme::{ACTIVE_NODE, EDGE_LINE, LABEL_TEXT, NODE_OUTLINE};
use crate::topology::layout::{Point, Positions};
use crate::topology::{NodeId, Snapshot};
use ratatui::style::Color;

/// Minimal drawing interface the renderer paints through
pub trait Surface {
    /// Discard everything drawn so far
    fn clear(&mut self);

    /// Straight line segment between two points
    fn line(&mut self, from: Point, to: Point, color: Color);

    /// Filled circle with an outline
    fn disc(&mut self, center: Point, radius: f64, fill: Color, outline: Color);

    /// Text anchored at `at` (top-left of the text)
    fn text(&mut self, at: Point, text: &str, color: Color);
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        color: Color,
    },
    Disc {
        center: Point,
        radius: f64,
        fill: Color,
        outline: Color,
    },
    Text {
        at: Point,
        text: String,
        color: Color,
    },
}

/// Display list recorded from a render pass
///
/// Clearing drops every primitive, so a scene only ever holds one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Surface for Scene {
    fn clear(&mut self) {
        self.primitives.clear();
    }

    fn line(&mut self, from: Point, to: Point, color: Color) {
        self.primitives.push(Primitive::Line { from, to, color });
    }

    fn disc(&mut self, center: Point, radius: f64, fill: Color, outline: Color) {
        self.primitives.push(Primitive::Disc {
            center,
            radius,
            fill,
            outline,
        });
    }

    fn text(&mut self, at: Point, text: &str, color: Color) {
        self.primitives.push(Primitive::Text {
            at,
            text: text.to_string(),
            color,
        });
    }
}

/// An edge that could not be drawn because an endpoint has no position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedEdge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Summary of a render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub edges_drawn: usize,
    pub nodes_drawn: usize,
    /// Edges referencing nodes that are not part of the snapshot
    pub skipped_edges: Vec<SkippedEdge>,
}

/// Repaint the full surface from `snapshot` and its `positions`
///
/// Edges with a missing endpoint are skipped and reported; the rest of the
/// frame is still drawn. Nodes without a position are skipped the same way,
/// which cannot happen when `positions` came from the same snapshot.
pub fn render(surface: &mut dyn Surface, snapshot: &Snapshot, positions: &Positions) -> RenderReport {
    let mut report = RenderReport::default();

    surface.clear();

    for edge in &snapshot.edges {
        match (positions.get(&edge.source), positions.get(&edge.target)) {
            (Some(&from), Some(&to)) => {
                surface.line(from, to, EDGE_LINE);
                report.edges_drawn += 1;
            }
            _ => {
                tracing::warn!(
                    source = %edge.source,
                    target = %edge.target,
                    "Skipping edge with an endpoint missing from the snapshot"
                );
                report.skipped_edges.push(SkippedEdge {
                    source: edge.source,
                    target: edge.target,
                });
            }
        }
    }

    for node in &snapshot.nodes {
        let Some(&center) = positions.get(&node.id) else {
            tracing::warn!(node = %node.id, "Node has no layout position");
            continue;
        };
        surface.disc(center, NODE_RADIUS, ACTIVE_NODE, NODE_OUTLINE);
        let label_at = Point::new(center.x + LABEL_OFFSET.0, center.y + LABEL_OFFSET.1);
        surface.text(label_at, &node.id.to_string(), LABEL_TEXT);
        report.nodes_drawn += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::layout::{compute_positions, LayoutConfig};
    use crate::topology::{Edge, Metrics, Node};

    fn two_node_snapshot() -> Snapshot {
        Snapshot {
            nodes: vec![Node { id: NodeId(1) }, Node { id: NodeId(2) }],
            edges: vec![Edge { source: NodeId(1), target: NodeId(2), latency: None }],
            metrics: Metrics { packet_loss: 2.5, jitter: 10.0 },
        }
    }

    fn square_config() -> LayoutConfig {
        LayoutConfig { width: 400.0, height: 400.0, radius: 200.0 }
    }

    #[test]
    fn test_draw_order_edges_then_nodes() {
        let snapshot = two_node_snapshot();
        let positions = compute_positions(&snapshot, &square_config());
        let mut scene = Scene::default();
        let report = render(&mut scene, &snapshot, &positions);

        assert_eq!(report.edges_drawn, 1);
        assert_eq!(report.nodes_drawn, 2);
        assert!(report.skipped_edges.is_empty());

        let prims = scene.primitives();
        assert_eq!(prims.len(), 5);
        assert!(matches!(prims[0], Primitive::Line { .. }));
        assert!(matches!(prims[1], Primitive::Disc { .. }));
        assert!(matches!(prims[2], Primitive::Text { .. }));
        assert!(matches!(prims[3], Primitive::Disc { .. }));
        assert!(matches!(prims[4], Primitive::Text { .. }));
    }

    #[test]
    fn test_edge_connects_layout_positions() {
        let snapshot = two_node_snapshot();
        let positions = compute_positions(&snapshot, &square_config());
        let mut scene = Scene::default();
        render(&mut scene, &snapshot, &positions);

        let Primitive::Line { from, to, color } = &scene.primitives()[0] else {
            panic!("first primitive should be the edge");
        };
        assert!((from.x - 400.0).abs() < 1e-9 && (from.y - 200.0).abs() < 1e-9);
        assert!(to.x.abs() < 1e-9 && (to.y - 200.0).abs() < 1e-9);
        assert_eq!(*color, EDGE_LINE);
    }

    #[test]
    fn test_node_disc_and_label() {
        let snapshot = two_node_snapshot();
        let positions = compute_positions(&snapshot, &square_config());
        let mut scene = Scene::default();
        render(&mut scene, &snapshot, &positions);

        assert_eq!(
            scene.primitives()[1],
            Primitive::Disc {
                center: Point::new(400.0, 200.0),
                radius: NODE_RADIUS,
                fill: ACTIVE_NODE,
                outline: NODE_OUTLINE,
            }
        );
        let Primitive::Text { at, text, .. } = &scene.primitives()[2] else {
            panic!("label should follow the disc");
        };
        assert_eq!(text, "1");
        assert!(at.y < 200.0, "label sits above the node");
    }

    #[test]
    fn test_render_is_idempotent() {
        let snapshot = two_node_snapshot();
        let positions = compute_positions(&snapshot, &square_config());
        let mut scene = Scene::default();

        render(&mut scene, &snapshot, &positions);
        let first = scene.clone();
        render(&mut scene, &snapshot, &positions);

        assert_eq!(scene, first);
    }

    #[test]
    fn test_render_discards_previous_frame() {
        let snapshot = two_node_snapshot();
        let positions = compute_positions(&snapshot, &square_config());
        let mut scene = Scene::default();
        render(&mut scene, &snapshot, &positions);

        let empty = Snapshot::default();
        render(&mut scene, &empty, &compute_positions(&empty, &square_config()));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_dangling_edge_is_skipped() {
        let mut snapshot = two_node_snapshot();
        snapshot.edges.insert(0, Edge { source: NodeId(1), target: NodeId(99), latency: None });
        snapshot.edges.push(Edge { source: NodeId(42), target: NodeId(2), latency: None });
        let positions = compute_positions(&snapshot, &square_config());

        let mut scene = Scene::default();
        let report = render(&mut scene, &snapshot, &positions);

        assert_eq!(report.edges_drawn, 1);
        assert_eq!(report.nodes_drawn, 2);
        assert_eq!(
            report.skipped_edges,
            vec![
                SkippedEdge { source: NodeId(1), target: NodeId(99) },
                SkippedEdge { source: NodeId(42), target: NodeId(2) },
            ]
        );
        let lines = scene
            .primitives()
            .iter()
            .filter(|p| matches!(p, Primitive::Line { .. }))
            .count();
        assert_eq!(lines, 1);
    }
}
