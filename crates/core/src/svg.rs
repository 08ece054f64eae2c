//! SVG export: turns a [`Scene`] into a standalone SVG document.

use std::collections::HashMap;
use std::fmt::Write as _;

use bfg_protocol::{OverlayKind, RenderCommand, TextAlign, ThemeToken, palette_rgb};

use crate::views::{HitRegion, Scene};

const OVERLAY_LINE_HEIGHT: f64 = 18.0;
const OVERLAY_PADDING: f64 = 8.0;

/// Render `scene` as an SVG document string, sized to the scene content.
///
/// Hoverable frames carry a `<title>` with their tooltip text so the export
/// stays inspectable in a browser. `dark` selects the color scheme.
pub fn render_svg(scene: &Scene, dark: bool) -> String {
    let width = scene.width.max(scene.viewport.width);
    let height = scene.height.max(scene.viewport.height);
    let regions: HashMap<u64, &HitRegion> =
        scene.hit_regions.iter().map(|r| (r.frame_id, r)).collect();

    let mut svg = String::with_capacity(scene.commands.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:sans-serif">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        resolve_color(ThemeToken::Background, dark)
    );

    for cmd in &scene.commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                frame_id,
            } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    resolve_color(*color, dark)
                );
                if let Some(border) = border_color {
                    let _ = write!(svg, r#" stroke="{}""#, resolve_color(*border, dark));
                }
                match frame_id.and_then(|id| regions.get(&id)) {
                    Some(region) => {
                        let _ = write!(
                            svg,
                            "><title>{}</title></rect>",
                            escape_xml(&region.tooltip_text())
                        );
                    }
                    None => svg.push_str("/>"),
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
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{}""#,
                    position.x,
                    position.y,
                    resolve_color(*color, dark),
                    text_anchor(*align)
                );
                if !visible {
                    svg.push_str(r#" visibility="hidden""#);
                }
                let _ = write!(svg, ">{}</text>", escape_xml(text));
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    resolve_color(*color, dark)
                );
            }
            RenderCommand::DrawOverlay {
                kind,
                anchor,
                lines,
            } => {
                let class = match kind {
                    OverlayKind::Help => "help",
                    OverlayKind::NoData => "no-data",
                };
                let _ = write!(svg, r#"<g class="{class}">"#);
                if *kind == OverlayKind::Help {
                    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
                    let _ = write!(
                        svg,
                        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" opacity="0.9"/>"#,
                        anchor.x,
                        anchor.y,
                        longest as f64 * 7.0 + 2.0 * OVERLAY_PADDING,
                        lines.len() as f64 * OVERLAY_LINE_HEIGHT + OVERLAY_PADDING,
                        resolve_color(ThemeToken::OverlayBackground, dark)
                    );
                }
                for (i, line) in lines.iter().enumerate() {
                    let _ = write!(
                        svg,
                        r#"<text x="{}" y="{}" fill="{}">{}</text>"#,
                        anchor.x + OVERLAY_PADDING,
                        anchor.y + (i + 1) as f64 * OVERLAY_LINE_HEIGHT,
                        resolve_color(ThemeToken::OverlayText, dark),
                        escape_xml(line)
                    );
                }
                svg.push_str("</g>");
            }
            RenderCommand::BeginGroup { id, .. } => {
                let _ = write!(svg, r#"<g class="{}">"#, escape_xml(id));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn text_anchor(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "start",
        TextAlign::Center => "middle",
        TextAlign::Right => "end",
    }
}

fn resolve_color(token: ThemeToken, dark: bool) -> String {
    let fixed = match (token, dark) {
        (ThemeToken::Palette(index), _) => {
            let (r, g, b) = palette_rgb(index);
            return format!("#{r:02x}{g:02x}{b:02x}");
        }
        (ThemeToken::Transparent, _) => "none",
        (ThemeToken::Highlight, _) => "#ffd600",
        (ThemeToken::RecordingIndicator, _) => "#e53935",
        (ThemeToken::FrameText, _) => "#000000",
        (ThemeToken::Border, true) => "#1a1a1a",
        (ThemeToken::Border, false) => "#ffffff",
        (ThemeToken::AxisLine | ThemeToken::AxisText, true) => "#bdbdbd",
        (ThemeToken::AxisLine | ThemeToken::AxisText, false) => "#333333",
        (ThemeToken::OverlayBackground, true) => "#2b2b2b",
        (ThemeToken::OverlayBackground, false) => "#f5f5f5",
        (ThemeToken::OverlayText, true) => "#ececec",
        (ThemeToken::OverlayText, false) => "#1a1a1a",
        (ThemeToken::Background, true) => "#181818",
        (ThemeToken::Background, false) => "#ffffff",
    };
    fixed.to_string()
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
