use super::*;
use crate::animation::ease::Ease;
use crate::animation::node::AnimationNode;
use crate::animation::timing::timing;
use crate::style::color::HexColorNormalizer;
use crate::updater::sink::InMemoryCommitSink;
use crate::updater::state::LastValue;
use serde_json::json;

fn committer(sink: Rc<InMemoryCommitSink>, strategy: CommitStrategy) -> Committer {
    Committer {
        sink,
        targets: SharedValue::new(Vec::new()),
        views: None,
        colors: None,
        strategy,
    }
}

fn last() -> LastValues {
    let mut last = LastValues::new();
    last.insert("width".into(), LastValue::Plain(json!(10)));
    last.insert("left".into(), LastValue::Plain(json!(0)));
    last.insert("old".into(), LastValue::Animated(json!(1)));
    last
}

fn tree() -> StyleTree {
    let mut tree = StyleTree::new();
    tree.insert("height".into(), AnimationNode::from(json!(5)));
    tree.insert(
        "left".into(),
        AnimationNode::from(timing(json!(100), 50.0, Ease::Linear)),
    );
    tree
}

#[test]
fn incremental_initial_payload_merges_statics_and_seeds() {
    let c = committer(Rc::new(InMemoryCommitSink::new()), CommitStrategy::Incremental);
    let seeds: PropertyMap = [("left".to_string(), json!(0))].into_iter().collect();
    let out = c.initial_payload(&last(), &tree(), seeds);

    assert_eq!(out["width"], json!(10));
    assert_eq!(out["height"], json!(5));
    assert_eq!(out["left"], json!(0));
    assert!(!out.contains_key("old"));
}

#[test]
fn deterministic_initial_payload_is_a_diff_plus_seeds() {
    let strategy = CommitStrategy::Deterministic {
        adapters: Vec::new(),
        mirror: SharedValue::new(PropertyMap::new()),
    };
    let c = committer(Rc::new(InMemoryCommitSink::new()), strategy);
    let seeds: PropertyMap = [("left".to_string(), json!(0))].into_iter().collect();
    let out = c.initial_payload(&last(), &tree(), seeds);

    assert_eq!(out["width"], json!(null));
    assert_eq!(out["old"], json!(null));
    assert_eq!(out["height"], json!(5));
    assert_eq!(out["left"], json!(0));
}

#[test]
fn commit_skips_empty_and_normalizes_colors() {
    let sink = Rc::new(InMemoryCommitSink::new());
    let mut c = committer(sink.clone(), CommitStrategy::Incremental);
    c.colors = Some(Rc::new(HexColorNormalizer));

    c.commit(PropertyMap::new());
    assert!(sink.is_empty());

    let props: PropertyMap = [
        ("backgroundColor".to_string(), json!("#000")),
        ("title".to_string(), json!("#000")),
    ]
    .into_iter()
    .collect();
    c.commit(props);
    let committed = &sink.commits()[0].props;
    assert_eq!(committed["backgroundColor"], json!(0xff00_0000_u32));
    assert_eq!(committed["title"], json!("#000"));
}
