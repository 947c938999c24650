use super::*;
use serde_json::json;

const FADE: &str = r#"{
    "frames_per_second": 30,
    "properties": {
        "opacity": { "timing": { "to": 1.0, "duration_ms": 100, "ease": "in_out_quad" } },
        "left": { "spring": { "to": 20, "stiffness": 170 } },
        "width": 50,
        "transform": { "scale": 2 }
    }
}"#;

#[test]
fn parses_animated_and_static_props() {
    let s = StyleScript::from_json_str(FADE).unwrap();
    assert_eq!(s.frames_per_second, 30);
    assert_eq!(s.animated_count(), 2);

    let PropSpec::Timing(t) = &s.properties["opacity"] else {
        panic!("opacity should be a timing spec");
    };
    assert_eq!(t.ease, Ease::InOutQuad);
    let PropSpec::Spring(sp) = &s.properties["left"] else {
        panic!("left should be a spring spec");
    };
    assert_eq!(sp.config.stiffness, 170.0);
    assert_eq!(sp.config.mass, SpringConfig::default().mass);
    assert_eq!(s.properties["width"], PropSpec::Value(json!(50)));
    assert_eq!(
        s.properties["transform"],
        PropSpec::Value(json!({ "scale": 2 }))
    );
}

#[test]
fn fps_defaults_and_interval() {
    let s = StyleScript::from_json_str(r#"{"properties": {}}"#).unwrap();
    assert_eq!(s.frames_per_second, 60);
    assert!((s.frame_interval_ms() - 1000.0 / 60.0).abs() < 1e-12);
    assert_eq!(s.opts, BindingOpts::default());
}

#[test]
fn validation_rejects_bad_numbers() {
    let zero_fps = r#"{"frames_per_second": 0, "properties": {}}"#;
    assert!(matches!(
        StyleScript::from_json_str(zero_fps),
        Err(RestyleError::Validation(_))
    ));

    let negative = r#"{"properties": {"o": {"timing": {"to": 1, "duration_ms": -5}}}}"#;
    let err = StyleScript::from_json_str(negative).unwrap_err();
    assert!(err.to_string().contains("'o'"));

    let limp = r#"{"properties": {"x": {"spring": {"to": 1, "mass": 0}}}}"#;
    let err = StyleScript::from_json_str(limp).unwrap_err();
    assert!(err.to_string().contains("mass"));
}

#[test]
fn malformed_animation_spec_is_a_serde_error() {
    let bad = r#"{"properties": {"o": {"timing": {"duration_ms": 5}}}}"#;
    assert!(matches!(
        StyleScript::from_json_str(bad),
        Err(RestyleError::Serde(_))
    ));
}

#[test]
fn serializes_back_to_the_same_shape() {
    let s = StyleScript::from_json_str(FADE).unwrap();
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["properties"]["opacity"]["timing"]["duration_ms"], json!(100.0));
    assert_eq!(v["properties"]["width"], json!(50));
    let again: StyleScript = serde_json::from_value(v).unwrap();
    assert_eq!(again, s);
}

#[test]
fn producer_builds_fresh_tree_and_identity_tracks_properties() {
    let s = StyleScript::from_json_str(FADE).unwrap();
    let a = s.producer("a").unwrap();
    let b = s.producer("b").unwrap();
    assert_eq!(a.source_hash(), b.source_hash());

    let Some(AnimationNode::Composite(Composite::Map(tree))) = a.produce() else {
        panic!("producer should yield a map");
    };
    assert_eq!(tree.len(), 4);
    assert!(tree["opacity"].as_terminal().is_some());
    assert!(tree["width"].as_terminal().is_none());
    assert!(tree.keys().eq(s.to_tree().keys()));

    let mut edited = s.clone();
    edited
        .properties
        .insert("height".into(), PropSpec::Value(json!(1)));
    assert_ne!(edited.producer("a").unwrap().source_hash(), a.source_hash());
}
