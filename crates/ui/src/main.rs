#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use bfg_core::ViewerConfig;
    use bfg_ui::ViewerApp;

    // RUST_LOG=debug for per-request and per-render detail.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = ViewerConfig::from_env()?;
    log::info!("bfg starting, recorder at {}", config.profile_url());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("bfg")
            .with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "bfg",
        options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))
}

#[cfg(target_arch = "wasm32")]
fn main() {}
