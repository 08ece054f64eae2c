use bfg_core::{
    InputEvent, InteractionState, Outcome, RecordingState, Request, Scene, Session, ViewerConfig,
};
use bfg_protocol::{ThemeToken, Viewport};
use eframe::egui;

use crate::backend::{Backend, Completion};
use crate::renderer;
use crate::theme::{self, ThemeMode};

/// Main application state.
pub struct ViewerApp {
    config: ViewerConfig,
    session: Session,
    interaction: InteractionState,
    /// Scene on screen; rebuilt when `dirty`.
    scene: Scene,
    dirty: bool,
    backend: Backend,
    theme_mode: ThemeMode,
    /// Whether the pointer was over the surface last frame.
    pointer_inside: bool,
    /// UI-side problems (e.g. a failed SVG save), shown next to the status.
    notice: Option<String>,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        let theme_mode = ThemeMode::Dark;
        cc.egui_ctx.set_visuals(theme_mode.visuals());

        let session = Session::new();
        let backend = Backend::new(cc.egui_ctx.clone(), config.clone());
        backend.dispatch(session.initial_load());

        let viewport = Viewport::default();
        Self {
            config,
            session,
            interaction: InteractionState::new(viewport),
            scene: Scene::new(viewport, 0.0, 0.0),
            dirty: true,
            backend,
            theme_mode,
            pointer_inside: false,
            notice: None,
        }
    }

    fn process_completions(&mut self) {
        for completion in self.backend.drain() {
            match completion {
                Completion::Finished {
                    request: Request::FetchProfile,
                    body,
                } => {
                    // Errors are logged and shown by the session.
                    if self.session.on_profile_fetched(&body).is_ok() {
                        self.dirty = true;
                    }
                }
                Completion::Finished { request, .. } => {
                    if let Some(next) = self.session.on_request_complete(request) {
                        self.backend.dispatch(next);
                    }
                }
                Completion::Failed { request, error } => {
                    self.session.on_request_failed(request, error);
                }
            }
        }
    }

    fn apply(&mut self, event: InputEvent) {
        let outcome = self
            .interaction
            .handle(event, self.session.zoom_mut(), &self.scene);
        if outcome == Outcome::Rerender {
            self.dirty = true;
        }
    }

    fn ensure_scene(&mut self) {
        if !self.dirty {
            return;
        }
        self.scene = self
            .session
            .render(&self.interaction.viewport(), &self.config);
        self.interaction.attach(&self.scene);
        self.dirty = false;
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let controls = self.session.controls();
        ui.horizontal(|ui| {
            ui.heading("bfg");
            ui.separator();

            if ui
                .add_enabled(controls.record_enabled, egui::Button::new("Record"))
                .clicked()
            {
                if let Some(request) = self.session.handle_record_click() {
                    self.backend.dispatch(request);
                }
            }
            if ui
                .add_enabled(controls.stop_enabled, egui::Button::new("Stop"))
                .clicked()
            {
                if let Some(request) = self.session.handle_stop_click() {
                    self.backend.dispatch(request);
                }
            }

            if self.session.state() == RecordingState::Recording {
                ui.colored_label(
                    theme::resolve(ThemeToken::RecordingIndicator, self.theme_mode),
                    &controls.status,
                );
            } else if !controls.status.is_empty() {
                ui.colored_label(ui.visuals().error_fg_color, &controls.status);
            }
            if let Some(notice) = &self.notice {
                ui.colored_label(ui.visuals().warn_fg_color, notice);
            }

            ui.separator();

            if ui.button("Zoom out").clicked() {
                self.apply(InputEvent::ZoomOut);
            }
            ui.label(self.session.zoom().percent_label());
            if ui.button("Zoom in").clicked() {
                self.apply(InputEvent::ZoomIn);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme_label = match self.theme_mode {
                    ThemeMode::Dark => "Light",
                    ThemeMode::Light => "Dark",
                };
                if ui.button(theme_label).clicked() {
                    self.theme_mode = self.theme_mode.toggled();
                    ui.ctx().set_visuals(self.theme_mode.visuals());
                }

                #[cfg(not(target_arch = "wasm32"))]
                if ui.button("Save SVG").clicked() {
                    self.save_svg();
                }
            });
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_svg(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name("flamegraph.svg")
            .save_file()
        else {
            return;
        };
        let svg = bfg_core::svg::render_svg(&self.scene, self.theme_mode.is_dark());
        match std::fs::write(&path, svg) {
            Ok(()) => {
                log::info!("saved {}", path.display());
                self.notice = None;
            }
            Err(e) => {
                log::error!("failed to save {}: {e}", path.display());
                self.notice = Some(format!("Failed to save SVG: {e}"));
            }
        }
    }

    /// Translate this frame's pointer and wheel input into engine events.
    fn surface_input(&mut self, ui: &egui::Ui, surface: egui::Rect) {
        let (hover, primary_down, pressed, released, scroll) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_down(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.raw_scroll_delta,
            )
        });

        let Some(pos) = hover.filter(|p| surface.contains(*p)) else {
            if self.pointer_inside {
                self.pointer_inside = false;
                self.apply(InputEvent::PointerLeave);
            }
            return;
        };
        self.pointer_inside = true;
        let x = f64::from(pos.x - surface.left());
        let y = f64::from(pos.y - surface.top());

        if pressed {
            self.apply(InputEvent::PointerDown {
                x,
                y,
                primary: true,
            });
        }
        self.apply(InputEvent::PointerMove { x, y, primary_down });
        if released {
            self.apply(InputEvent::PointerUp);
        }
        if scroll.y != 0.0 {
            // egui reports wheel-up as positive; the engine expects DOM sign.
            self.apply(InputEvent::Wheel {
                x,
                delta_y: -f64::from(scroll.y),
            });
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_completions();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let surface = ui.available_rect_before_wrap();
                let viewport = Viewport::new(f64::from(surface.width()), f64::from(surface.height()));
                if viewport != self.interaction.viewport() {
                    self.apply(InputEvent::Resize {
                        width: viewport.width,
                        height: viewport.height,
                    });
                }
                self.ensure_scene();

                let _ = ui.allocate_rect(surface, egui::Sense::click_and_drag());
                self.surface_input(ui, surface);
                self.ensure_scene();

                let painter = ui.painter_at(surface);
                painter.rect_filled(
                    surface,
                    egui::CornerRadius::ZERO,
                    theme::resolve(ThemeToken::Background, self.theme_mode),
                );
                renderer::paint_scene(
                    &painter,
                    &self.scene,
                    surface.min,
                    self.interaction.scroll_left(),
                    self.interaction.hovered(),
                    self.theme_mode,
                );

                if let Some(tooltip) = self.interaction.tooltip() {
                    let pos = surface.min
                        + egui::vec2(tooltip.position.x as f32, tooltip.position.y as f32);
                    egui::Area::new(egui::Id::new("frame_tooltip"))
                        .fixed_pos(pos)
                        .order(egui::Order::Tooltip)
                        .interactable(false)
                        .show(ctx, |ui| {
                            egui::Frame::popup(ui.style()).show(ui, |ui| {
                                ui.label(&tooltip.text);
                            });
                        });
                }
            });
    }
}
