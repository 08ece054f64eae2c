use bfg_protocol::{Point, Viewport};
use serde::{Deserialize, Serialize};

use crate::views::Scene;
use crate::zoom::{ZoomState, anchored_offset};

/// Tooltip distance to the right of the pointer.
const TOOLTIP_OFFSET_X: f64 = 20.0;

/// Host input, in coordinates relative to the top-left of the visible
/// surface. Content coordinates are `x + scroll_left`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerMove { x: f64, y: f64, primary_down: bool },
    PointerDown { x: f64, y: f64, primary: bool },
    PointerUp,
    PointerLeave,
    Wheel { x: f64, delta_y: f64 },
    Resize { width: f64, height: f64 },
    ZoomIn,
    ZoomOut,
}

/// What the host has to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Outcome {
    Unchanged,
    /// Hover or scroll moved; the current scene is still valid.
    Repaint,
    /// Zoom or viewport changed; build a new scene, then [`InteractionState::attach`] it.
    Rerender,
}

/// Horizontal scroll position over content wider than the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScrollSurface {
    pub scroll_left: f64,
    pub visible_width: f64,
    pub content_width: f64,
}

impl ScrollSurface {
    pub fn max_scroll(&self) -> f64 {
        (self.content_width - self.visible_width).max(0.0)
    }

    /// Set the offset, clamped to the scrollable range. Returns whether it moved.
    pub fn scroll_to(&mut self, scroll_left: f64) -> bool {
        let next = if scroll_left.is_finite() {
            scroll_left.clamp(0.0, self.max_scroll())
        } else {
            0.0
        };
        let changed = next != self.scroll_left;
        self.scroll_left = next;
        changed
    }

    pub fn to_content(&self, x: f64) -> f64 {
        x + self.scroll_left
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: String,
    /// Surface coordinates.
    pub position: Point,
}

/// Hover, tooltip, scroll and drag state for one flame graph surface.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    viewport: Viewport,
    scroll: ScrollSurface,
    /// Content x where the current drag started.
    pan_anchor: Option<f64>,
    /// Last pointer position in surface coordinates.
    pointer: Option<Point>,
    hovered: Option<u64>,
    tooltip: Option<Tooltip>,
}

impl InteractionState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll: ScrollSurface {
                visible_width: viewport.width,
                ..ScrollSurface::default()
            },
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll(&self) -> &ScrollSurface {
        &self.scroll
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll.scroll_left
    }

    pub fn hovered(&self) -> Option<u64> {
        self.hovered
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Adopt a freshly rendered scene: clamp the scroll offset to its width
    /// and re-run the hit test under the last known pointer.
    pub fn attach(&mut self, scene: &Scene) {
        self.scroll.content_width = scene.width;
        self.scroll.visible_width = self.viewport.width;
        self.scroll.scroll_to(self.scroll.scroll_left);
        match self.pointer {
            Some(pointer) => {
                self.update_hover(pointer, scene);
            }
            None => self.clear_hover(),
        }
    }

    pub fn handle(&mut self, event: InputEvent, zoom: &mut ZoomState, scene: &Scene) -> Outcome {
        match event {
            InputEvent::PointerMove { x, y, primary_down } => {
                let pointer = Point::new(x, y);
                self.pointer = Some(pointer);
                let mut outcome = Outcome::Unchanged;
                if !primary_down {
                    self.pan_anchor = None;
                } else if let Some(anchor) = self.pan_anchor {
                    let drift = self.scroll.to_content(x) - anchor;
                    if self.scroll.scroll_to(self.scroll.scroll_left - drift) {
                        outcome = Outcome::Repaint;
                    }
                }
                outcome.max(self.update_hover(pointer, scene))
            }
            InputEvent::PointerDown { x, y, primary } => {
                self.pointer = Some(Point::new(x, y));
                if primary {
                    self.pan_anchor = Some(self.scroll.to_content(x));
                }
                Outcome::Unchanged
            }
            InputEvent::PointerUp => {
                self.pan_anchor = None;
                Outcome::Unchanged
            }
            InputEvent::PointerLeave => {
                self.pan_anchor = None;
                self.pointer = None;
                if self.hovered.is_some() || self.tooltip.is_some() {
                    self.clear_hover();
                    Outcome::Repaint
                } else {
                    Outcome::Unchanged
                }
            }
            InputEvent::Wheel { x, delta_y } => {
                let delta = wheel_step(delta_y);
                if delta == 0 || !zoom.adjust(delta) {
                    return Outcome::Unchanged;
                }
                let anchored = anchored_offset(delta, self.scroll.to_content(x)) - x;
                // Clamped against the new content width in `attach`.
                self.scroll.scroll_left = anchored.max(0.0);
                Outcome::Rerender
            }
            InputEvent::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                self.scroll.visible_width = width;
                Outcome::Rerender
            }
            InputEvent::ZoomIn => zoom_outcome(zoom.adjust(1)),
            InputEvent::ZoomOut => zoom_outcome(zoom.adjust(-1)),
        }
    }

    fn update_hover(&mut self, pointer: Point, scene: &Scene) -> Outcome {
        let content = Point::new(self.scroll.to_content(pointer.x), pointer.y);
        match scene.hit_test(content) {
            Some(region) => {
                let changed = self.hovered != Some(region.frame_id);
                self.hovered = Some(region.frame_id);
                self.tooltip = Some(Tooltip {
                    text: region.tooltip_text(),
                    position: Point::new(pointer.x + TOOLTIP_OFFSET_X, pointer.y),
                });
                if changed {
                    log::trace!("hover frame {}", region.frame_id);
                    Outcome::Repaint
                } else {
                    Outcome::Unchanged
                }
            }
            None if self.hovered.is_some() => {
                self.clear_hover();
                Outcome::Repaint
            }
            None => Outcome::Unchanged,
        }
    }

    fn clear_hover(&mut self) {
        self.hovered = None;
        self.tooltip = None;
    }
}

/// Wheel up zooms in, wheel down zooms out, one level per event.
fn wheel_step(delta_y: f64) -> i32 {
    if delta_y < 0.0 {
        1
    } else if delta_y > 0.0 {
        -1
    } else {
        0
    }
}

fn zoom_outcome(changed: bool) -> Outcome {
    if changed {
        Outcome::Rerender
    } else {
        Outcome::Unchanged
    }
}
