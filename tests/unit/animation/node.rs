use super::*;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn start_runs_once_and_flips_phase() {
    let starts = Rc::new(Cell::new(0));
    let s = Rc::clone(&starts);
    let mut t = Terminal::from_fns(
        json!(0),
        move |cur, seed, _, _| {
            s.set(s.get() + 1);
            *cur = seed.clone();
        },
        |_, _| true,
    );
    assert_eq!(t.phase(), StartPhase::Pending);
    t.start(json!(7), Timestamp(3.0), None);
    t.start(json!(9), Timestamp(4.0), None);
    assert_eq!(starts.get(), 1);
    assert_eq!(t.phase(), StartPhase::Started);
    assert_eq!(t.current(), &json!(7));
    assert_eq!(t.timestamp(), Timestamp(3.0));
}

#[test]
fn completion_callback_fires_at_most_once() {
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let mut t = Terminal::from_fns(json!(0), |_, _, _, _| {}, |_, _| true)
        .with_callback(move |_| h.set(h.get() + 1));
    let mut fired = Completions::new();
    t.complete(true, &mut fired);
    t.complete(false, &mut fired);
    assert_eq!(fired.len(), 1);
    assert_eq!(hits.get(), 0);
    fired.run();
    assert_eq!(hits.get(), 1);
}

#[test]
fn builders_produce_composites() {
    let node = AnimationNode::map([
        ("a", AnimationNode::from(json!(1))),
        ("b", AnimationNode::seq([AnimationNode::from(json!(2))])),
    ]);
    let AnimationNode::Composite(Composite::Map(m)) = node else {
        panic!("expected map composite");
    };
    assert!(matches!(m["b"], AnimationNode::Composite(Composite::Seq(ref v)) if v.len() == 1));
    assert!(m["a"].as_terminal().is_none());
}
