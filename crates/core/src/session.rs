use bfg_protocol::Viewport;
use serde::Serialize;

use crate::config::ViewerConfig;
use crate::model::{CallNode, ProfileError, ProfileSnapshot};
use crate::views::{Scene, render_flame_graph};
use crate::zoom::ZoomState;

pub const RECORDING_STATUS: &str = "Recording...";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

/// Backend call the host has to perform on the session's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Request {
    /// `POST record`
    StartRecording,
    /// `POST stop`
    StopRecording,
    /// `GET profile.json`
    FetchProfile,
}

impl Request {
    pub fn url(&self, config: &ViewerConfig) -> String {
        match self {
            Request::StartRecording => config.record_url(),
            Request::StopRecording => config.stop_url(),
            Request::FetchProfile => config.profile_url(),
        }
    }

    pub fn is_post(&self) -> bool {
        !matches!(self, Request::FetchProfile)
    }
}

/// Toolbar state derived from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub record_enabled: bool,
    pub stop_enabled: bool,
    pub status: String,
}

/// Record/stop state machine plus the profile and zoom level on display.
///
/// Performs no I/O: every operation that needs the backend returns the
/// [`Request`] for the host to run, and the host reports back through
/// [`Session::on_request_complete`] / [`Session::on_profile_fetched`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: RecordingState,
    snapshot: Option<ProfileSnapshot>,
    zoom: ZoomState,
    last_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The profile is fetched once when the viewer opens.
    pub fn initial_load(&self) -> Request {
        Request::FetchProfile
    }

    pub fn handle_record_click(&mut self) -> Option<Request> {
        match self.state {
            RecordingState::Idle => {
                log::info!("recording started");
                self.state = RecordingState::Recording;
                self.last_error = None;
                Some(Request::StartRecording)
            }
            RecordingState::Recording => None,
        }
    }

    pub fn handle_stop_click(&mut self) -> Option<Request> {
        match self.state {
            RecordingState::Recording => {
                log::info!("recording stopped");
                self.state = RecordingState::Idle;
                Some(Request::StopRecording)
            }
            RecordingState::Idle => None,
        }
    }

    /// A request finished successfully. Stopping is followed by a fetch of
    /// the fresh profile.
    pub fn on_request_complete(&mut self, request: Request) -> Option<Request> {
        match request {
            Request::StopRecording => Some(Request::FetchProfile),
            Request::StartRecording | Request::FetchProfile => None,
        }
    }

    /// A request failed. Nothing is retried and the state is left as is.
    pub fn on_request_failed(&mut self, request: Request, error: impl std::fmt::Display) {
        log::error!("{request:?} failed: {error}");
        self.last_error = Some(format!("{request:?} failed: {error}"));
    }

    /// Parse a fetched `profile.json` and make it the displayed snapshot.
    /// On error the previous snapshot stays.
    pub fn on_profile_fetched(&mut self, data: &[u8]) -> Result<(), ProfileError> {
        match ProfileSnapshot::from_json(data) {
            Ok(Some(snapshot)) => {
                log::info!(
                    "loaded profile: {} nodes, run time {:.3}s",
                    snapshot.root().map_or(0, CallNode::node_count),
                    snapshot.run_time()
                );
                self.snapshot = Some(snapshot);
                self.last_error = None;
                Ok(())
            }
            Ok(None) => {
                log::info!("backend has no profile yet");
                Ok(())
            }
            Err(e) => {
                log::error!("rejected profile: {e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&ProfileSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut ZoomState {
        &mut self.zoom
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn controls(&self) -> Controls {
        let recording = self.state == RecordingState::Recording;
        let status = if recording {
            RECORDING_STATUS.to_string()
        } else {
            self.last_error.clone().unwrap_or_default()
        };
        Controls {
            record_enabled: !recording,
            stop_enabled: recording,
            status,
        }
    }

    pub fn render(&self, viewport: &Viewport, config: &ViewerConfig) -> Scene {
        render_flame_graph(self.snapshot.as_ref(), &self.zoom, viewport, config)
    }
}
