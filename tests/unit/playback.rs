use super::*;
use crate::updater::sink::InMemoryCommitSink;
use serde_json::json;

#[test]
fn plays_until_settled() {
    let script = StyleScript::from_json_str(
        r#"{"frames_per_second": 10,
            "properties": {"opacity": {"timing": {"to": 1, "duration_ms": 250}}, "width": 5}}"#,
    )
    .unwrap();
    let sink = Rc::new(InMemoryCommitSink::new());
    let stats = play(&script, &PlaybackOpts::default(), sink.clone()).unwrap();

    assert!(stats.settled);
    // Frames land at 100, 200 and 300 ms; the third one finishes the 250 ms timing.
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.commits, 4);
    assert_eq!(sink.len(), 4);
    let applied = sink.applied();
    assert_eq!(applied["opacity"], json!(1));
    assert_eq!(applied["width"], json!(5));
    assert_eq!(sink.commits()[0].targets, vec![ViewDescriptor::new(1, "View")]);
}

#[test]
fn stops_at_max_frames() {
    let script = StyleScript::from_json_str(
        r#"{"properties": {"x": {"timing": {"to": 1, "duration_ms": 10000}}}}"#,
    )
    .unwrap();
    let opts = PlaybackOpts {
        max_frames: 5,
        ..PlaybackOpts::default()
    };
    let stats = play(&script, &opts, Rc::new(InMemoryCommitSink::new())).unwrap();
    assert_eq!(stats.frames, 5);
    assert!(!stats.settled);
}
