//! Integration tests: fetch payloads from fixtures through the session,
//! layout, render and interaction layers.

use bfg_core::layout::{Layout, layout};
use bfg_core::views::overlay::NO_DATA_MESSAGE;
use bfg_core::{
    InputEvent, InteractionState, Outcome, ProfileSnapshot, Request, SceneContent, Session,
    ViewerConfig, ZoomState,
};
use bfg_protocol::{OverlayKind, RenderCommand, Viewport};

const ROOT_A_B: &[u8] = include_bytes!("fixtures/root_a_b.json");
const RECORDING: &[u8] = include_bytes!("fixtures/recording.json");
const NO_SAMPLES: &[u8] = include_bytes!("fixtures/no_samples.json");

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn siblings_split_the_root_by_sample_share() {
    let snapshot = ProfileSnapshot::from_json(ROOT_A_B)
        .expect("fixture parses")
        .expect("fixture has a body");
    let root = snapshot.root().expect("fixture has a root");

    let Layout::Partition(partition) = layout(root, 1000.0, 400.0) else {
        panic!("fixture has samples");
    };
    let spans: Vec<_> = partition
        .rects
        .iter()
        .map(|r| (r.node.label.to_string(), r.x0, r.x1))
        .collect();
    assert_eq!(spans.len(), 3);
    assert_eq!(spans[0], ("root".to_string(), 0.0, 1.0));
    assert_eq!(spans[1].0, "a");
    assert!(close(spans[1].1, 0.0) && close(spans[1].2, 0.6));
    assert_eq!(spans[2].0, "b");
    assert!(close(spans[2].1, 0.6) && close(spans[2].2, 1.0));
}

#[test]
fn zoom_steps_and_clamps() {
    let mut zoom = ZoomState::new();
    assert!(zoom.adjust(1));
    assert_eq!(zoom.level(), 1);
    assert_eq!(zoom.scale_factor(), 1.5);

    let mut zoom = ZoomState::new();
    assert!(!zoom.adjust(-1));
    assert_eq!(zoom.level(), 0);
}

#[test]
fn record_stop_then_hover_the_fetched_profile() {
    let config = ViewerConfig::default();
    let viewport = Viewport::new(1010.0, 610.0);
    let mut session = Session::new();

    assert_eq!(session.initial_load(), Request::FetchProfile);
    assert_eq!(session.handle_record_click(), Some(Request::StartRecording));
    assert_eq!(session.handle_stop_click(), Some(Request::StopRecording));
    let next = session.on_request_complete(Request::StopRecording);
    assert_eq!(next, Some(Request::FetchProfile));
    session.on_profile_fetched(RECORDING).expect("fixture parses");

    let snapshot = session.snapshot().expect("profile loaded");
    assert_eq!(snapshot.run_time(), 2.5);
    assert_eq!(snapshot.total_samples(), Some(250.0));

    let scene = session.render(&viewport, &config);
    assert_eq!(scene.content, SceneContent::Graph);
    // The spacer is laid out but never hoverable.
    assert_eq!(scene.hit_regions.len(), 6);

    let escape = scene
        .hit_regions
        .iter()
        .find(|r| r.label == "escape")
        .expect("escape frame is hoverable");
    let x = escape.rect.x + escape.rect.w / 2.0;
    let y = escape.rect.y + escape.rect.h / 2.0;

    let mut interaction = InteractionState::new(viewport);
    interaction.attach(&scene);
    let outcome = interaction.handle(
        InputEvent::PointerMove {
            x,
            y,
            primary_down: false,
        },
        session.zoom_mut(),
        &scene,
    );
    assert_eq!(outcome, Outcome::Repaint);
    let tooltip = interaction.tooltip().expect("hovering a frame");
    assert!(tooltip.text.contains("12ms escape"), "{}", tooltip.text);
}

#[test]
fn wheel_zoom_keeps_the_point_under_the_cursor() {
    let config = ViewerConfig::default();
    let viewport = Viewport::new(1010.0, 610.0);
    let mut session = Session::new();
    session.on_profile_fetched(RECORDING).expect("fixture parses");

    let scene = session.render(&viewport, &config);
    let mut interaction = InteractionState::new(viewport);
    interaction.attach(&scene);

    let cursor = 400.0;
    for _ in 0..3 {
        let scene = session.render(&viewport, &config);
        let before = interaction.scroll_left() + cursor;
        let outcome = interaction.handle(
            InputEvent::Wheel {
                x: cursor,
                delta_y: -100.0,
            },
            session.zoom_mut(),
            &scene,
        );
        assert_eq!(outcome, Outcome::Rerender);
        interaction.attach(&session.render(&viewport, &config));
        assert!(close(interaction.scroll_left() + cursor, before * 1.5));
    }
    assert_eq!(session.zoom().percent_label(), "337%");
}

#[test]
fn empty_recording_shows_the_no_data_notice() {
    let mut session = Session::new();
    session
        .on_profile_fetched(NO_SAMPLES)
        .expect("fixture parses");
    let snapshot = session.snapshot().expect("snapshot replaced");
    assert!(!snapshot.has_samples());

    let scene = session.render(&Viewport::new(800.0, 600.0), &ViewerConfig::default());
    assert_eq!(scene.content, SceneContent::NoData);
    assert!(scene.hit_regions.is_empty());
    assert!(
        !scene
            .commands
            .iter()
            .any(|c| matches!(c, RenderCommand::DrawRect { .. } | RenderCommand::DrawLine { .. }))
    );
    let notice = scene.commands.iter().find_map(|c| match c {
        RenderCommand::DrawOverlay {
            kind: OverlayKind::NoData,
            lines,
            ..
        } => lines.first().cloned(),
        _ => None,
    });
    assert_eq!(notice.as_deref(), Some(NO_DATA_MESSAGE));
    assert!(scene.commands.iter().any(|c| matches!(
        c,
        RenderCommand::DrawOverlay {
            kind: OverlayKind::Help,
            ..
        }
    )));
}

#[test]
fn scene_exports_to_svg() {
    let mut session = Session::new();
    session.on_profile_fetched(RECORDING).expect("fixture parses");
    let scene = session.render(&Viewport::new(1010.0, 610.0), &ViewerConfig::default());

    let svg = bfg_core::svg::render_svg(&scene, false);
    assert!(svg.contains("<title>1750ms handle_request</title>"));
    assert!(svg.contains(">2.5s</text>") || svg.contains(">2s</text>"));
    assert!(svg.contains(r#"<g class="axis">"#));
}

#[test]
fn commands_serialize_for_web_frontends() {
    let mut session = Session::new();
    session.on_profile_fetched(ROOT_A_B).expect("fixture parses");
    let scene = session.render(&Viewport::new(610.0, 410.0), &ViewerConfig::default());

    let json = serde_json::to_string(&scene.commands).expect("commands serialize");
    let back: Vec<RenderCommand> = serde_json::from_str(&json).expect("commands deserialize");
    assert_eq!(back, scene.commands);
}
