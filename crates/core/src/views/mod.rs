pub mod flame_graph;
pub mod overlay;
pub mod time_axis;

use bfg_protocol::{Point, Rect, RenderCommand, SharedStr, Viewport};

pub use flame_graph::{render_flame_graph, truncate_label};

/// What a scene ended up showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneContent {
    /// No profile has been loaded yet.
    Empty,
    /// A profile was loaded but holds no samples.
    NoData,
    Graph,
}

/// A hoverable frame: its pixel box in content coordinates plus what the
/// tooltip needs, so the scene never refers back to the call tree.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub rect: Rect,
    pub frame_id: u64,
    pub label: SharedStr,
    pub sample_count: f64,
}

impl HitRegion {
    /// `"<whole milliseconds>ms <label>"`.
    pub fn tooltip_text(&self) -> String {
        format!("{}ms {}", (self.sample_count * 1000.0).floor(), self.label)
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    /// Content size in pixels; `width` is the horizontally scrollable extent.
    pub width: f64,
    pub height: f64,
    pub content: SceneContent,
    pub commands: Vec<RenderCommand>,
    pub hit_regions: Vec<HitRegion>,
}

impl Scene {
    pub fn new(viewport: Viewport, width: f64, height: f64) -> Self {
        Self {
            viewport,
            width,
            height,
            content: SceneContent::Empty,
            commands: Vec::new(),
            hit_regions: Vec::new(),
        }
    }

    /// Frame under `point` (content coordinates), if any. Spacers are never
    /// hit because they have no region.
    pub fn hit_test(&self, point: Point) -> Option<&HitRegion> {
        self.hit_regions.iter().find(|h| h.rect.contains(point))
    }
}
