use super::*;
use serde_json::json;

fn props(entries: &[(&str, serde_json::Value)]) -> PropertyMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn records_calls_and_replays_removals() {
    let sink = InMemoryCommitSink::new();
    let views: BTreeSet<ViewRef> = [ViewRef(3)].into_iter().collect();
    let target = [ViewDescriptor::new(1, "View")];

    sink.commit(&target, &props(&[("a", json!(1)), ("b", json!(2))]), None);
    sink.commit(&target, &props(&[("a", json!(null))]), Some(&views));
    assert_eq!(sink.len(), 2);
    assert_eq!(sink.commits()[1].views, Some(views));

    let applied = sink.applied();
    assert!(!applied.contains_key("a"));
    assert_eq!(applied["b"], json!(2));

    assert_eq!(sink.take().len(), 2);
    assert!(sink.is_empty());
}
