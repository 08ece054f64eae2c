use bfg_core::{InputEvent, InteractionState, Outcome, Scene, Session, ViewerConfig};
use bfg_protocol::Viewport;
use wasm_bindgen::prelude::*;

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// A flame graph surface driven from JavaScript.
///
/// The host feeds it profile bytes and DOM events; it answers with render
/// commands (JSON) or SVG, and with the zoom label, scroll offset and
/// tooltip the page should show.
#[wasm_bindgen]
pub struct FlameGraphView {
    config: ViewerConfig,
    session: Session,
    interaction: InteractionState,
    scene: Scene,
    dirty: bool,
}

#[wasm_bindgen]
impl FlameGraphView {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> FlameGraphView {
        let viewport = Viewport::new(width, height);
        FlameGraphView {
            config: ViewerConfig::default(),
            session: Session::new(),
            interaction: InteractionState::new(viewport),
            scene: Scene::new(viewport, 0.0, 0.0),
            dirty: true,
        }
    }

    /// Replace the displayed profile with a `profile.json` document. On error
    /// the previous profile stays.
    pub fn load_profile(&mut self, data: &[u8]) -> Result<(), JsError> {
        self.session.on_profile_fetched(data).map_err(js_error)?;
        self.dirty = true;
        Ok(())
    }

    /// Forward one input event, e.g. `{"type":"wheel","x":10,"delta_y":-1}`.
    /// Returns `"Unchanged"`, `"Repaint"` or `"Rerender"`.
    pub fn handle_event(&mut self, event_json: &str) -> Result<String, JsError> {
        let event: InputEvent = serde_json::from_str(event_json).map_err(js_error)?;
        self.refresh();
        let outcome = self
            .interaction
            .handle(event, self.session.zoom_mut(), &self.scene);
        if outcome == Outcome::Rerender {
            self.dirty = true;
        }
        Ok(format!("{outcome:?}"))
    }

    /// Current scene as a JSON array of render commands.
    pub fn render_commands(&mut self) -> Result<String, JsError> {
        self.refresh();
        serde_json::to_string(&self.scene.commands).map_err(js_error)
    }

    pub fn render_svg(&mut self, dark: bool) -> String {
        self.refresh();
        bfg_core::svg::render_svg(&self.scene, dark)
    }

    /// Scrollable content width in pixels.
    pub fn content_width(&mut self) -> f64 {
        self.refresh();
        self.scene.width
    }

    pub fn scroll_left(&mut self) -> f64 {
        self.refresh();
        self.interaction.scroll_left()
    }

    pub fn zoom_label(&self) -> String {
        self.session.zoom().percent_label()
    }

    pub fn hovered_frame(&self) -> Option<u64> {
        self.interaction.hovered()
    }

    /// Tooltip as `{"text": ..., "position": {"x": ..., "y": ...}}`, if any.
    pub fn tooltip(&self) -> Result<Option<String>, JsError> {
        self.interaction
            .tooltip()
            .map(|t| serde_json::to_string(t).map_err(js_error))
            .transpose()
    }
}

impl FlameGraphView {
    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.scene = self
            .session
            .render(&self.interaction.viewport(), &self.config);
        self.interaction.attach(&self.scene);
        self.dirty = false;
        log::debug!("scene rebuilt: {} commands", self.scene.commands.len());
    }
}
