//! Engine behind the bfg flame graph viewer: call-tree model, partition
//! layout, zoom, scene rendering, pointer interaction and the record/stop
//! session. Nothing in here performs I/O.

pub mod config;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod session;
pub mod svg;
pub mod views;
pub mod zoom;

pub use config::{ConfigError, ViewerConfig};
pub use interaction::{InputEvent, InteractionState, Outcome};
pub use model::{CallNode, ProfileError, ProfileSnapshot};
pub use session::{Controls, RecordingState, Request, Session};
pub use views::{HitRegion, Scene, SceneContent};
pub use zoom::ZoomState;
