// Theme module - Color constants
//
// Palette shared by the renderer and the terminal panels.

use ratatui::style::Color;

/// Primary accent color - used for borders, titles, key hints
/// RGB: (187, 154, 247)
pub const ACCENT: Color = Color::Rgb(187, 154, 247);

/// Warning indicator - used for stale data and shortened refresh intervals
/// RGB: (255, 158, 100)
pub const WARNING: Color = Color::Rgb(255, 158, 100);

/// Danger indicator - used for fetch errors and failed actions
/// RGB: (247, 118, 142)
pub const DANGER: Color = Color::Rgb(247, 118, 142);

/// Healthy indicator - fill of every active node
/// RGB: (158, 206, 106)
pub const ACTIVE_NODE: Color = Color::Rgb(158, 206, 106);

/// Neutral text - used for general text and node labels
/// RGB: (169, 177, 214)
pub const TEXT: Color = Color::Rgb(169, 177, 214);

/// Outline drawn around node discs
pub const NODE_OUTLINE: Color = Color::Rgb(255, 255, 255);

/// Links between nodes
pub const EDGE_LINE: Color = Color::Rgb(110, 118, 150);

/// Node id labels
pub const LABEL_TEXT: Color = TEXT;

/// Get color for the refresh interval relative to its default
///
/// - ACTIVE_NODE green: default or slower than default
/// - WARNING: faster than default
/// - DANGER: more than twice as fast as default
pub fn refresh_color(interval_ms: u64, default_ms: u64) -> Color {
    if interval_ms >= default_ms {
        return ACTIVE_NODE;
    }
    let ratio = (default_ms - interval_ms) as f32 / default_ms as f32;
    if ratio > 0.5 {
        DANGER
    } else {
        WARNING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_color() {
        assert_eq!(refresh_color(5000, 5000), ACTIVE_NODE);
        assert_eq!(refresh_color(9000, 5000), ACTIVE_NODE);
        assert_eq!(refresh_color(4000, 5000), WARNING);
        assert_eq!(refresh_color(1000, 5000), DANGER);
    }
}
