use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` per render pass, in content
/// coordinates (before horizontal scrolling). Frontends consume the list
/// sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle. `frame_id` identifies the call node for
    /// hover highlighting; spacers carry `None`.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        frame_id: Option<u64>,
    },

    /// Draw a text string anchored at a position. Invisible text is still
    /// emitted so a frontend can toggle it without a new layout.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
        visible: bool,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// A block of static text pinned to the visible surface rather than the
    /// scrolled content (help legend, no-data notice).
    DrawOverlay {
        kind: OverlayKind,
        anchor: Point,
        lines: Vec<SharedStr>,
    },

    /// Begin a logical group (axis, frames). Renderers may use this for
    /// batching or layer separation.
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    Help,
    NoData,
}
