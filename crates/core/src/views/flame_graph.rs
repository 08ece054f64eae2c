use std::collections::HashMap;

use bfg_protocol::{
    FLAME_PALETTE, Point, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport,
};

use super::overlay::{help_overlay, no_data_overlay};
use super::time_axis::render_time_axis;
use super::{HitRegion, Scene, SceneContent};
use crate::config::ViewerConfig;
use crate::layout::{Layout, Partition, layout};
use crate::model::ProfileSnapshot;
use crate::zoom::ZoomState;

const LABEL_FONT_SIZE: f64 = 12.0;
const ELLIPSIS: &str = "...";

/// Build the full scene for `snapshot` at the current zoom.
///
/// The layout box is `zoom × viewport.width − pad` wide and
/// `viewport.height − pad` tall. Nothing from the snapshot is retained
/// beyond cheap label clones.
pub fn render_flame_graph(
    snapshot: Option<&ProfileSnapshot>,
    zoom: &ZoomState,
    viewport: &Viewport,
    config: &ViewerConfig,
) -> Scene {
    let width = (zoom.scale_factor() * viewport.width - config.pad_size).max(0.0);
    let height = (viewport.height - config.pad_size).max(0.0);
    let mut scene = Scene::new(*viewport, width, height);

    if let Some(snapshot) = snapshot {
        match snapshot.root().map(|root| layout(root, width, height)) {
            Some(Layout::Partition(partition)) => {
                scene.content = SceneContent::Graph;
                push_frames(&mut scene, &partition, config);
                scene.commands.push(RenderCommand::BeginGroup {
                    id: SharedStr::from("axis"),
                    label: Some(SharedStr::from("Run time")),
                });
                scene.commands.extend(render_time_axis(
                    width,
                    snapshot.run_time(),
                    config.pixels_per_tick,
                ));
                scene.commands.push(RenderCommand::EndGroup);
            }
            None | Some(Layout::NoData) => {
                scene.content = SceneContent::NoData;
                scene.commands.push(no_data_overlay(config.pad_size));
            }
        }
    }

    scene.commands.push(help_overlay(viewport));
    log::debug!(
        "rendered {:?} scene: {} commands, {} hoverable frames, {width:.0}x{height:.0}px",
        scene.content,
        scene.commands.len(),
        scene.hit_regions.len()
    );
    scene
}

fn push_frames(scene: &mut Scene, partition: &Partition<'_>, config: &ViewerConfig) {
    let mut palette = PaletteAssigner::default();
    let show_text = partition.band_height() > config.min_text_height;

    scene.commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from("frames"),
        label: Some(SharedStr::from("Flame graph")),
    });

    for (index, rect) in partition.rects.iter().enumerate() {
        let px = partition.pixel_rect(rect);
        let node = rect.node;

        if node.is_spacer() {
            scene.commands.push(RenderCommand::DrawRect {
                rect: px,
                color: ThemeToken::Transparent,
                border_color: None,
                frame_id: None,
            });
            continue;
        }

        let frame_id = index as u64;
        scene.commands.push(RenderCommand::DrawRect {
            rect: px,
            color: palette.token_for(&node.label),
            border_color: Some(ThemeToken::Border),
            frame_id: Some(frame_id),
        });

        let text = truncate_label(&node.label, px.w, config.pixels_per_char);
        if !text.is_empty() {
            scene.commands.push(RenderCommand::DrawText {
                position: Point::new(px.x + config.text_offset_x, px.y + config.text_offset_y),
                text: SharedStr::from(text),
                color: ThemeToken::FrameText,
                font_size: LABEL_FONT_SIZE,
                align: TextAlign::Left,
                visible: show_text,
            });
        }

        if px.w > 0.0 {
            scene.hit_regions.push(HitRegion {
                rect: px,
                frame_id,
                label: node.label.clone(),
                sample_count: node.sample_count,
            });
        }
    }

    scene.commands.push(RenderCommand::EndGroup);
}

/// Hands out palette slots in order of first appearance, so a label keeps
/// its color for the whole pass.
#[derive(Default)]
struct PaletteAssigner {
    slots: HashMap<SharedStr, u8>,
}

impl PaletteAssigner {
    fn token_for(&mut self, label: &SharedStr) -> ThemeToken {
        let next = (self.slots.len() % FLAME_PALETTE.len()) as u8;
        ThemeToken::Palette(*self.slots.entry(label.clone()).or_insert(next))
    }
}

/// Fit `label` into a box `width` pixels wide, assuming each character
/// takes `pixels_per_char`.
///
/// With `slots = width / pixels_per_char`: three slots or fewer show
/// nothing; a label longer than `floor(slots)` characters keeps its first
/// `floor(slots)` characters followed by `...`; anything else is returned
/// unchanged. The ellipsis may overhang the box by three characters.
///
/// A label of `slots − 3` to `floor(slots)` characters is shown whole with
/// no ellipsis. Appending one there would make the result shrink again on
/// a second pass; with this cut a truncated label is a fixed point.
pub fn truncate_label(label: &str, width: f64, pixels_per_char: f64) -> String {
    let slots = width / pixels_per_char;
    if slots <= 3.0 {
        return String::new();
    }

    let keep = slots.floor() as usize;
    if label.chars().count() > keep {
        let mut text: String = label.chars().take(keep).collect();
        text.push_str(ELLIPSIS);
        text
    } else {
        label.to_string()
    }
}
