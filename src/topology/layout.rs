// Layout engine
//
// Places the nodes of a snapshot evenly on a single ring around the centre
// of the drawing surface. Node order in the snapshot is the only input that
// decides where a node lands; edges never move anything.

use super::{NodeId, Snapshot};
use crate::app::config::{DEFAULT_RING_RADIUS, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use std::collections::HashMap;
use std::f64::consts::PI;

/// A point in surface coordinates (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node id to surface coordinate, recomputed from scratch every cycle
pub type Positions = HashMap<NodeId, Point>;

/// Geometry the layout is computed against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Drawing surface width in surface units
    pub width: f64,
    /// Drawing surface height in surface units
    pub height: f64,
    /// Radius of the ring the nodes are placed on
    pub radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
            radius: DEFAULT_RING_RADIUS,
        }
    }
}

impl LayoutConfig {
    /// Midpoint of the drawing surface
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Compute the position of every node in `snapshot`
///
/// The i-th node (0-indexed, snapshot order) of N sits at angle `2πi/N` on
/// a circle of `config.radius` around the surface midpoint. An empty
/// snapshot produces an empty map.
pub fn compute_positions(snapshot: &Snapshot, config: &LayoutConfig) -> Positions {
    let count = snapshot.nodes.len();
    let mut positions = Positions::with_capacity(count);
    if count == 0 {
        return positions;
    }

    let center = config.center();
    for (idx, node) in snapshot.nodes.iter().enumerate() {
        let angle = 2.0 * PI * idx as f64 / count as f64;
        positions.insert(
            node.id,
            Point::new(
                center.x + config.radius * angle.cos(),
                center.y + config.radius * angle.sin(),
            ),
        );
    }
    positions
}
