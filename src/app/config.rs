// Application configuration types
//
// This module contains:
// - Layout and rendering constants
// - Backend connection defaults
// - Refresh interval bounds and the runtime RefreshConfig
// - Command-line arguments

use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};

// ============================================================================
// Constants
// ============================================================================

/// Backend base URL used when `--url` is not given
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

/// Timeout applied to every backend request
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Default snapshot refresh period in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 5000;

/// Minimum refresh interval in milliseconds
pub const MIN_REFRESH_MS: u64 = 1000;

/// Maximum refresh interval in milliseconds
pub const MAX_REFRESH_MS: u64 = 60000;

/// Refresh interval adjustment step in milliseconds
pub const REFRESH_STEP: u64 = 1000;

/// Duration to highlight a recently changed refresh interval
pub const CHANGE_HIGHLIGHT_DURATION: Duration = Duration::from_millis(500);

/// Width of the virtual drawing surface
pub const DEFAULT_SURFACE_WIDTH: f64 = 800.0;

/// Height of the virtual drawing surface
pub const DEFAULT_SURFACE_HEIGHT: f64 = 600.0;

/// Radius of the ring nodes are placed on
pub const DEFAULT_RING_RADIUS: f64 = 200.0;

/// Radius of a node disc
pub const NODE_RADIUS: f64 = 10.0;

/// Offset of a node label from the node centre (up and slightly left)
pub const LABEL_OFFSET: (f64, f64) = (-5.0, -15.0);

// ============================================================================
// Command line
// ============================================================================

/// Command-line arguments
#[derive(Debug, Clone, Parser)]
#[command(name = "topowatch", about = "Live network topology viewer")]
pub struct Args {
    /// Base URL of the network simulation backend
    #[arg(long, default_value = DEFAULT_BACKEND_URL)]
    pub url: String,

    /// Snapshot refresh interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_REFRESH_MS)]
    pub refresh_ms: u64,

    /// File diagnostic logs are written to
    #[arg(long, default_value = "topowatch.log")]
    pub log_file: PathBuf,
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Configuration for the periodic refresh
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Refresh interval in milliseconds (MIN_REFRESH_MS..=MAX_REFRESH_MS)
    pub refresh_ms: u64,

    /// Timestamp of last interval change (for visual feedback)
    pub last_change: Option<Instant>,
}

impl RefreshConfig {
    /// Create a RefreshConfig, clamping the interval into bounds
    pub fn new(refresh_ms: u64) -> Self {
        Self {
            refresh_ms: refresh_ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS),
            last_change: None,
        }
    }

    /// Get refresh interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    /// Lengthen the interval by one step
    pub fn slow_down(&mut self) {
        self.refresh_ms = self
            .refresh_ms
            .saturating_add(REFRESH_STEP)
            .min(MAX_REFRESH_MS);
        self.last_change = Some(Instant::now());
    }

    /// Shorten the interval by one step
    pub fn speed_up(&mut self) {
        self.refresh_ms = self
            .refresh_ms
            .saturating_sub(REFRESH_STEP)
            .max(MIN_REFRESH_MS);
        self.last_change = Some(Instant::now());
    }

    /// Whether the interval changed recently enough to highlight it
    pub fn recently_changed(&self) -> bool {
        self.last_change
            .map(|t| t.elapsed() < CHANGE_HIGHLIGHT_DURATION)
            .unwrap_or(false)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_MS)
    }
}
