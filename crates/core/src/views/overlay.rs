use bfg_protocol::{OverlayKind, Point, RenderCommand, SharedStr, Viewport};

/// Distance of the help legend's left edge from the right edge of the
/// visible surface, and of its top edge from the surface top.
const LEGEND_OFFSET_X: f64 = 400.0;
const LEGEND_Y: f64 = 100.0;

const HELP_LINES: [&str; 3] = [
    "\u{2022} Hover over a frame to see its stats",
    "\u{2022} Scroll the wheel to zoom at the cursor",
    "\u{2022} Drag to pan left and right",
];

pub const NO_DATA_MESSAGE: &str =
    "Sorry, no samples. Seems like run time is less than sampling interval.";

/// Static help legend, pinned to the visible surface.
pub fn help_overlay(viewport: &Viewport) -> RenderCommand {
    RenderCommand::DrawOverlay {
        kind: OverlayKind::Help,
        anchor: Point::new((viewport.width - LEGEND_OFFSET_X).max(0.0), LEGEND_Y),
        lines: HELP_LINES.iter().copied().map(SharedStr::from).collect(),
    }
}

/// Notice shown in place of the graph when the profile has no samples.
pub fn no_data_overlay(pad: f64) -> RenderCommand {
    RenderCommand::DrawOverlay {
        kind: OverlayKind::NoData,
        anchor: Point::new(pad, pad),
        lines: vec![SharedStr::from(NO_DATA_MESSAGE)],
    }
}
