use serde::{Deserialize, Serialize};

pub const MIN_ZOOM_LEVEL: i32 = 0;
pub const MAX_ZOOM_LEVEL: i32 = 12;

/// Magnification per zoom step.
const ZOOM_BASE: f64 = 1.5;

/// Discrete horizontal zoom. Each level multiplies the render width by 1.5,
/// so the widest surface is 1.5^12 (about 129x) the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomState {
    level: i32,
}

impl ZoomState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Step the level by `delta`, clamped to the supported range.
    /// Returns whether the level changed (and a re-render is due).
    pub fn adjust(&mut self, delta: i32) -> bool {
        let next = self
            .level
            .saturating_add(delta)
            .clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL);
        if next == self.level {
            return false;
        }
        log::debug!("zoom level {} -> {next}", self.level);
        self.level = next;
        true
    }

    pub fn scale_factor(&self) -> f64 {
        scale_factor(self.level)
    }

    /// Toolbar text, e.g. `"150%"`.
    pub fn percent_label(&self) -> String {
        format!("{}%", (100.0 * self.scale_factor()).floor())
    }
}

pub fn scale_factor(level: i32) -> f64 {
    ZOOM_BASE.powi(level)
}

/// Content offset that keeps the point at `coord` under the cursor after
/// the level moved by `delta`.
pub fn anchored_offset(delta: i32, coord: f64) -> f64 {
    ZOOM_BASE.powi(delta) * coord
}
