use bfg_protocol::{ThemeToken, palette_rgb};

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            ThemeMode::Dark => egui::Visuals::dark(),
            ThemeMode::Light => egui::Visuals::light(),
        }
    }
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    resolve_rgba(token, mode).to_color32()
}

fn resolve_rgba(token: ThemeToken, mode: ThemeMode) -> ResolvedColor {
    // Frame fills are the same categorical palette in both modes.
    if let ThemeToken::Palette(index) = token {
        let (r, g, b) = palette_rgb(index);
        return ResolvedColor::rgb(r, g, b);
    }
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Palette(_) | Transparent => ResolvedColor::rgba(0, 0, 0, 0),
        Highlight => ResolvedColor::rgb(0xff, 0xd6, 0x00),

        FrameText => ResolvedColor::rgb(0x11, 0x11, 0x1b),
        AxisLine => ResolvedColor::rgb(0x6c, 0x70, 0x86),
        AxisText => ResolvedColor::rgb(0xba, 0xc2, 0xde),

        OverlayBackground => ResolvedColor::rgba(0x1e, 0x1e, 0x2e, 230),
        OverlayText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),

        Background => ResolvedColor::rgb(0x11, 0x11, 0x1b),
        Border => ResolvedColor::rgb(0x11, 0x11, 0x1b),
        RecordingIndicator => ResolvedColor::rgb(0xf3, 0x8b, 0xa8),
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Palette(_) | Transparent => ResolvedColor::rgba(0, 0, 0, 0),
        Highlight => ResolvedColor::rgb(255, 200, 50),

        FrameText => ResolvedColor::rgb(20, 20, 30),
        AxisLine => ResolvedColor::rgb(120, 120, 130),
        AxisText => ResolvedColor::rgb(60, 60, 70),

        OverlayBackground => ResolvedColor::rgba(245, 245, 248, 230),
        OverlayText => ResolvedColor::rgb(40, 40, 50),

        Background => ResolvedColor::rgb(255, 255, 255),
        Border => ResolvedColor::rgb(255, 255, 255),
        RecordingIndicator => ResolvedColor::rgb(211, 47, 47),
    }
}
