//! Runs session requests against the recorder backend off the UI thread and
//! queues the results for the next frame.

use std::sync::{Arc, Mutex};

use bfg_core::{Request, ViewerConfig};

/// Result of one backend request.
#[derive(Debug)]
pub enum Completion {
    Finished { request: Request, body: Vec<u8> },
    Failed { request: Request, error: String },
}

#[derive(Clone)]
pub struct Backend {
    config: Arc<ViewerConfig>,
    completed: Arc<Mutex<Vec<Completion>>>,
    ctx: egui::Context,
}

impl Backend {
    pub fn new(ctx: egui::Context, config: ViewerConfig) -> Self {
        Self {
            config: Arc::new(config),
            completed: Arc::new(Mutex::new(Vec::new())),
            ctx,
        }
    }

    /// Start `request` in the background. There is no timeout or retry.
    pub fn dispatch(&self, request: Request) {
        let url = request.url(&self.config);
        log::debug!("{request:?}: {} {url}", if request.is_post() { "POST" } else { "GET" });
        self.spawn(request, url);
    }

    /// Take everything that finished since the last call.
    pub fn drain(&self) -> Vec<Completion> {
        let mut lock = self.completed.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *lock)
    }

    fn complete(&self, request: Request, result: anyhow::Result<Vec<u8>>) {
        let completion = match result {
            Ok(body) => Completion::Finished { request, body },
            Err(e) => Completion::Failed {
                request,
                error: format!("{e:#}"),
            },
        };
        if let Ok(mut lock) = self.completed.lock() {
            lock.push(completion);
        }
        self.ctx.request_repaint();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn(&self, request: Request, url: String) {
        let backend = self.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("bfg-{request:?}"))
            .spawn(move || {
                let result = fetch_blocking(&url, request.is_post());
                backend.complete(request, result);
            });
        if let Err(e) = spawned {
            self.complete(request, Err(anyhow::anyhow!("failed to spawn request thread: {e}")));
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn(&self, request: Request, url: String) {
        let backend = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_web(&url, request.is_post()).await;
            backend.complete(request, result);
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_blocking(url: &str, post: bool) -> anyhow::Result<Vec<u8>> {
    use std::io::Read;

    let response = if post {
        ureq::post(url).call()?
    } else {
        ureq::get(url).call()?
    };
    let mut body = Vec::new();
    response.into_reader().read_to_end(&mut body)?;
    Ok(body)
}

#[cfg(target_arch = "wasm32")]
async fn fetch_web(url: &str, post: bool) -> anyhow::Result<Vec<u8>> {
    use anyhow::anyhow;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let init = web_sys::RequestInit::new();
    init.set_method(if post { "POST" } else { "GET" });

    let resp_value = JsFuture::from(window.fetch_with_str_and_init(url, &init))
        .await
        .map_err(|e| anyhow!("{e:?}"))?;
    let resp: web_sys::Response = resp_value
        .dyn_into()
        .map_err(|_| anyhow!("not a Response"))?;
    if !resp.ok() {
        return Err(anyhow!("HTTP {}", resp.status()));
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(|e| anyhow!("{e:?}"))?)
        .await
        .map_err(|e| anyhow!("{e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}
