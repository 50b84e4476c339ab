use ipoint_common::settings::{SharedSettings, TrackingSettings, TransferConfig};
use ipoint_model::landmark::{
    EyeTopology, LandmarkPoint, LandmarkSet, FACE_MESH_LANDMARKS, LEFT_EYE, RIGHT_EYE,
};
use ipoint_model::pointer::{PointerFrame, PointerPosition, ScreenPoint, ScreenSize};
use ipoint_model::stream::{parse_frames, parse_pointer_records, LandmarkFrame, PointerStreamHeader};
use ipoint_tracking_core::sink::{JsonlPointerWriter, RecordingSink};
use ipoint_tracking_core::TrackingPipeline;

const MS: u64 = 1_000_000;
const OPEN: f32 = 0.02;
const SHUT: f32 = 0.008;

fn place_eye(points: &mut [LandmarkPoint], eye: &EyeTopology, center: (f32, f32), lid: f32) {
    for (k, &index) in eye.contour.iter().enumerate() {
        let angle = k as f32 * std::f32::consts::TAU / 16.0;
        points[index] = LandmarkPoint::new(center.0 + 0.05 * angle.cos(), center.1 + lid * angle.sin());
    }
}

/// A 468-point face with both eyes at the given centres and lid opening.
fn face(left: (f32, f32), right: (f32, f32), lid: f32) -> LandmarkSet {
    let mut points = vec![LandmarkPoint::new(0.5, 0.9); FACE_MESH_LANDMARKS];
    place_eye(&mut points, &LEFT_EYE, left, lid);
    place_eye(&mut points, &RIGHT_EYE, right, lid);
    LandmarkSet::new(points)
}

fn centered_face(lid: f32) -> LandmarkSet {
    face((0.3, 0.5), (0.7, 0.5), lid)
}

fn settings(smoothing: f32) -> SharedSettings {
    SharedSettings::new(TrackingSettings {
        transfer: TransferConfig::neutral(),
        cursor_smoothing: smoothing,
        ..TrackingSettings::default()
    })
    .unwrap()
}

fn pipeline(smoothing: f32) -> TrackingPipeline {
    TrackingPipeline::new(settings(smoothing), ScreenSize::new(1000.0, 800.0)).unwrap()
}

fn visible_point(position: PointerPosition) -> ScreenPoint {
    position.point().expect("pointer should be visible")
}

#[test]
fn centered_eyes_map_to_screen_center() {
    let mut pipeline = pipeline(0.0);
    let frame = pipeline.process_frame(&centered_face(OPEN), 0).unwrap();

    let p = visible_point(frame.overlay);
    assert!((p.x - 500.0).abs() < 1e-2, "x = {}", p.x);
    assert!((p.y - 400.0).abs() < 1e-2, "y = {}", p.y);
    assert_eq!(frame.cursor, frame.overlay);
    assert!(!frame.click);

    let estimate = pipeline.last_estimate().unwrap();
    assert!(estimate.left_region.is_some() && estimate.right_region.is_some());
}

#[test]
fn faceless_frame_publishes_hidden_sentinel() {
    let mut pipeline = pipeline(0.7);
    let frame = pipeline.process_frame(&LandmarkSet::empty(), 5).unwrap();
    assert_eq!(frame, PointerFrame::hidden(5));
    assert_eq!(frame.overlay.to_sentinel(), (-1.0, -1.0));
}

#[test]
fn garbage_landmarks_hide_the_pointer_without_failing() {
    let mut pipeline = pipeline(0.7);
    let garbage = LandmarkSet::new(vec![LandmarkPoint::new(3.0e38, 0.5); FACE_MESH_LANDMARKS]);
    let frame = pipeline.process_frame(&garbage, 0).unwrap();
    assert_eq!(frame, PointerFrame::hidden(0));

    let frame = pipeline.process_frame(&centered_face(OPEN), 33 * MS).unwrap();
    assert!(frame.overlay.is_visible());
}

#[test]
fn timestamps_near_the_end_of_the_clock_are_handled() {
    let mut pipeline = pipeline(0.7);
    pipeline.process_frame(&LandmarkSet::empty(), u64::MAX - 10).unwrap();
    pipeline.process_frame(&LandmarkSet::empty(), u64::MAX - 5).unwrap();
    let frame = pipeline.process_frame(&centered_face(OPEN), u64::MAX).unwrap();
    assert!(frame.overlay.is_visible());
    assert_eq!(pipeline.stats().frames, 3);
}

#[test]
fn blink_fires_one_click_at_cursor() {
    let mut pipeline = pipeline(0.7);
    let lids = [OPEN, OPEN, SHUT, OPEN, OPEN];
    let frames: Vec<PointerFrame> = lids
        .iter()
        .enumerate()
        .map(|(i, &lid)| {
            pipeline
                .process_frame(&centered_face(lid), i as u64 * 33 * MS)
                .unwrap()
        })
        .collect();

    let clicks: Vec<usize> = frames
        .iter()
        .enumerate()
        .filter(|(_, f)| f.click)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(clicks, vec![3]);
    assert!(frames[3].cursor.is_visible());
    assert_eq!(pipeline.stats().clicks, 1);
}

#[test]
fn face_loss_resets_blink_and_smoothing() {
    let mut pipeline = pipeline(0.7);
    pipeline.process_frame(&centered_face(OPEN), 0).unwrap();
    pipeline.process_frame(&centered_face(OPEN), 33 * MS).unwrap();
    pipeline.process_frame(&centered_face(SHUT), 66 * MS).unwrap();

    let lost = pipeline.process_frame(&LandmarkSet::empty(), 100 * MS).unwrap();
    assert!(!lost.cursor.is_visible());

    // The reopen after the gap only recalibrates.
    let back = pipeline
        .process_frame(&face((0.5, 0.3), (0.9, 0.3), OPEN), 133 * MS)
        .unwrap();
    assert!(!back.click);
    // Smoothing restarted, so the cursor jumps straight to the new target.
    assert_eq!(back.cursor, back.overlay);
    assert_eq!(pipeline.stats().clicks, 0);
}

#[test]
fn cursor_is_smoothed_but_overlay_is_raw() {
    let mut pipeline = pipeline(0.7);
    pipeline.process_frame(&centered_face(OPEN), 0).unwrap();
    let frame = pipeline
        .process_frame(&face((0.4, 0.5), (0.8, 0.5), OPEN), 33 * MS)
        .unwrap();

    let overlay = visible_point(frame.overlay);
    let cursor = visible_point(frame.cursor);
    assert!((overlay.x - 600.0).abs() < 1e-2);
    // 500 + (600 - 500) * 0.3
    assert!((cursor.x - 530.0).abs() < 1e-2);
}

#[test]
fn settings_changes_apply_on_next_frame() {
    let mut pipeline = pipeline(0.0);
    let handle = pipeline.settings().clone();

    let both = pipeline.process_frame(&centered_face(OPEN), 0).unwrap();
    assert!((visible_point(both.overlay).x - 500.0).abs() < 1e-2);

    handle.set_use_one_eye(true);
    let one = pipeline.process_frame(&centered_face(OPEN), 33 * MS).unwrap();
    assert!((visible_point(one.overlay).x - 700.0).abs() < 1e-2);
}

#[test]
fn replayed_stream_is_recorded_to_jsonl() {
    let recording: String = [OPEN, OPEN, SHUT, OPEN]
        .iter()
        .enumerate()
        .map(|(i, &lid)| {
            serde_json::to_string(&LandmarkFrame::new(i as u64 * 33 * MS, centered_face(lid))).unwrap()
        })
        .chain(std::iter::once(r#"{"t": 132000000, "landmarks": []}"#.to_string()))
        .collect::<Vec<_>>()
        .join("\n");
    let frames = parse_frames(&recording).unwrap();
    assert_eq!(frames.len(), 5);

    let dir = std::env::temp_dir().join("ipoint_test_replay_jsonl");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("pointer.jsonl");
    let header = PointerStreamHeader {
        schema_version: "1.0".to_string(),
        epoch_wall: "2026-01-01T00:00:00Z".to_string(),
        screen_width: 1000.0,
        screen_height: 800.0,
    };

    let mut pipeline = pipeline(0.7);
    pipeline.add_sink(Box::new(JsonlPointerWriter::create(&path, &header).unwrap()));
    pipeline.add_sink(Box::new(RecordingSink::new()));
    for frame in &frames {
        pipeline.process_frame(&frame.landmarks, frame.timestamp_ns).unwrap();
    }
    let stats = pipeline.finish().unwrap();
    assert_eq!(stats.frames, 5);
    assert_eq!(stats.tracked_frames, 4);
    assert_eq!(stats.clicks, 1);

    let content = std::fs::read_to_string(&path).unwrap();
    let records = parse_pointer_records(&content).unwrap();
    assert_eq!(records.len(), 5);
    assert!(records[3].click);
    assert!(!records[4].visible);
    assert_eq!((records[4].x, records[4].y), (-1.0, -1.0));

    std::fs::remove_dir_all(&dir).ok();
}
