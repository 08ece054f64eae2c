use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    /// Slot in [`FLAME_PALETTE`]; frontends wrap out-of-range indices.
    Palette(u8),
    /// Fully transparent fill (spacer frames).
    Transparent,
    /// Fill swapped in for the frame under the pointer.
    Highlight,

    FrameText,
    AxisLine,
    AxisText,

    OverlayBackground,
    OverlayText,

    Background,
    Border,

    /// Status text while a recording is running.
    RecordingIndicator,
}

/// Twenty-color categorical palette (light/dark pairs of ten hues) used for
/// frame fills, in `0xRRGGBB` form.
pub const FLAME_PALETTE: [u32; 20] = [
    0x1f77b4, 0xaec7e8, 0xff7f0e, 0xffbb78, 0x2ca02c, 0x98df8a, 0xd62728, 0xff9896, 0x9467bd,
    0xc5b0d5, 0x8c564b, 0xc49c94, 0xe377c2, 0xf7b6d2, 0x7f7f7f, 0xc7c7c7, 0xbcbd22, 0xdbdb8d,
    0x17becf, 0x9edae5,
];

/// Split a palette slot into RGB components.
pub fn palette_rgb(index: u8) -> (u8, u8, u8) {
    let rgb = FLAME_PALETTE[usize::from(index) % FLAME_PALETTE.len()];
    (((rgb >> 16) & 0xff) as u8, ((rgb >> 8) & 0xff) as u8, (rgb & 0xff) as u8)
}
