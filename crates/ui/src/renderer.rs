use bfg_core::Scene;
use bfg_protocol::{OverlayKind, RenderCommand, TextAlign, ThemeToken};
use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};

use crate::theme::{self, ThemeMode};

const OVERLAY_PADDING: f32 = 8.0;
const OVERLAY_LINE_GAP: f32 = 4.0;
const SCROLLBAR_HEIGHT: f32 = 4.0;

/// Paint `scene` into `painter`.
///
/// `origin` is the top-left of the visible surface. Content commands are
/// shifted left by `scroll_left`; overlays stay pinned to the surface. The
/// frame with `hovered` id is filled with the highlight color.
pub fn paint_scene(
    painter: &egui::Painter,
    scene: &Scene,
    origin: Pos2,
    scroll_left: f64,
    hovered: Option<u64>,
    mode: ThemeMode,
) {
    let to_screen = |x: f64, y: f64| {
        Pos2::new(
            origin.x + (x - scroll_left) as f32,
            origin.y + y as f32,
        )
    };

    for cmd in &scene.commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                frame_id,
            } => {
                let egui_rect =
                    Rect::from_min_size(to_screen(rect.x, rect.y), egui::vec2(rect.w as f32, rect.h as f32));
                if rect.w < 0.5 || !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }
                if *color == ThemeToken::Transparent {
                    continue;
                }

                let token = if frame_id.is_some() && *frame_id == hovered {
                    ThemeToken::Highlight
                } else {
                    *color
                };
                painter.rect_filled(egui_rect, CornerRadius::ZERO, theme::resolve(token, mode));
                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        CornerRadius::ZERO,
                        Stroke::new(1.0, theme::resolve(*bc, mode)),
                        StrokeKind::Inside,
                    );
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
                visible,
            } => {
                if !visible || text.is_empty() {
                    continue;
                }
                // Positions are text baselines.
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_BOTTOM,
                    TextAlign::Center => Align2::CENTER_BOTTOM,
                    TextAlign::Right => Align2::RIGHT_BOTTOM,
                };
                painter.text(
                    to_screen(position.x, position.y),
                    anchor,
                    text.as_str(),
                    FontId::proportional(*font_size as f32),
                    theme::resolve(*color, mode),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [to_screen(from.x, from.y), to_screen(to.x, to.y)],
                    Stroke::new(*width as f32, theme::resolve(*color, mode)),
                );
            }

            RenderCommand::DrawOverlay {
                kind,
                anchor,
                lines,
            } => {
                let top_left = origin + egui::vec2(anchor.x as f32, anchor.y as f32);
                paint_overlay(painter, *kind, top_left, lines, mode);
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }

    paint_scrollbar(painter, scene, origin, scroll_left, mode);
}

fn paint_overlay(
    painter: &egui::Painter,
    kind: OverlayKind,
    top_left: Pos2,
    lines: &[bfg_protocol::SharedStr],
    mode: ThemeMode,
) {
    let text_color = theme::resolve(ThemeToken::OverlayText, mode);
    let (font, boxed) = match kind {
        OverlayKind::Help => (FontId::proportional(12.0), true),
        OverlayKind::NoData => (FontId::proportional(16.0), false),
    };

    let galleys: Vec<_> = lines
        .iter()
        .map(|line| painter.layout_no_wrap(line.to_string(), font.clone(), text_color))
        .collect();

    if boxed {
        let width = galleys.iter().map(|g| g.size().x).fold(0.0, f32::max);
        let height: f32 = galleys.iter().map(|g| g.size().y + OVERLAY_LINE_GAP).sum();
        let bg = Rect::from_min_size(
            top_left,
            egui::vec2(width + 2.0 * OVERLAY_PADDING, height + 2.0 * OVERLAY_PADDING),
        );
        painter.rect_filled(
            bg,
            CornerRadius::same(4),
            theme::resolve(ThemeToken::OverlayBackground, mode),
        );
    }

    let mut cursor = top_left + egui::vec2(OVERLAY_PADDING, OVERLAY_PADDING);
    for galley in galleys {
        let line_height = galley.size().y;
        painter.galley(cursor, galley, text_color);
        cursor.y += line_height + OVERLAY_LINE_GAP;
    }
}

/// Thin position indicator along the bottom edge when the content is wider
/// than the surface.
fn paint_scrollbar(
    painter: &egui::Painter,
    scene: &Scene,
    origin: Pos2,
    scroll_left: f64,
    mode: ThemeMode,
) {
    let visible = scene.viewport.width;
    if scene.width <= visible || scene.width <= 0.0 {
        return;
    }
    let start = (scroll_left / scene.width * visible) as f32;
    let len = (visible / scene.width * visible) as f32;
    let y = origin.y + scene.viewport.height as f32 - SCROLLBAR_HEIGHT;
    let thumb = Rect::from_min_size(
        Pos2::new(origin.x + start, y),
        egui::vec2(len.max(8.0), SCROLLBAR_HEIGHT),
    );
    painter.rect_filled(
        thumb,
        CornerRadius::same(2),
        theme::resolve(ThemeToken::AxisLine, mode),
    );
}
