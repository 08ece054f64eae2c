pub mod commands;
pub mod shared_str;
pub mod theme;
pub mod types;

pub use commands::{OverlayKind, RenderCommand, TextAlign};
pub use shared_str::SharedStr;
pub use theme::{FLAME_PALETTE, ThemeToken, palette_rgb};
pub use types::{Point, Rect, Viewport};
