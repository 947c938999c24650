use super::*;
use crate::animation::ease::Ease;
use crate::animation::timing::timing;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Terminal whose frames report the scripted completion flags and count up `current`.
fn scripted(results: Vec<bool>) -> Terminal {
    let mut script = results.into_iter();
    Terminal::from_fns(
        json!(0),
        |cur, seed, _, _| *cur = seed.clone(),
        move |cur, _| {
            let n = cur.as_i64().unwrap_or(0);
            *cur = json!(n + 1);
            script.next().unwrap_or(true)
        },
    )
}

fn seed_recorder(log: Rc<RefCell<Vec<Value>>>) -> Terminal {
    Terminal::from_fns(
        json!("declared"),
        move |cur, seed, _, _| {
            log.borrow_mut().push(seed.clone());
            *cur = seed.clone();
        },
        |_, _| false,
    )
}

#[test]
fn step_reports_finish_on_second_frame() {
    let mut node = AnimationNode::from(scripted(vec![false, true]));
    prepare(&mut node, None, Prior::Plain(&json!(10)), Timestamp(0.0));

    let (done, v) = step(&mut node, Timestamp(16.0), true, &mut Completions::new());
    assert!(!done);
    assert_eq!(v, json!(11));

    let (done, v) = step(&mut node, Timestamp(32.0), true, &mut Completions::new());
    assert!(done);
    assert_eq!(v, json!(12));
    assert_eq!(node.as_terminal().unwrap().timestamp(), Timestamp(32.0));
}

#[test]
fn finished_terminal_short_circuits() {
    let frames = Rc::new(Cell::new(0));
    let f = Rc::clone(&frames);
    let mut node = AnimationNode::from(Terminal::from_fns(
        json!(1),
        |_, _, _, _| {},
        move |_, _| {
            f.set(f.get() + 1);
            true
        },
    ));
    prepare(&mut node, None, Prior::Absent, Timestamp(0.0));
    assert!(step(&mut node, Timestamp(1.0), true, &mut Completions::new()).0);
    assert!(step(&mut node, Timestamp(2.0), true, &mut Completions::new()).0);
    assert_eq!(frames.get(), 1);
}

#[test]
fn interruption_continues_from_in_flight_value() {
    let mut a = AnimationNode::from(timing(json!(100.0), 100.0, Ease::Linear));
    prepare(&mut a, None, Prior::Plain(&json!(0.0)), Timestamp(0.0));
    let (_, v) = step(&mut a, Timestamp(40.0), true, &mut Completions::new());
    assert_eq!(v, json!(40.0));

    // The committed snapshot still says the declared target; the live value must win.
    let mut b = AnimationNode::from(timing(json!(0.0), 100.0, Ease::Linear));
    prepare(&mut b, Some(&a), Prior::Animated(&json!(100.0)), Timestamp(40.0));
    assert_eq!(b.as_terminal().unwrap().current(), &json!(40.0));
}

#[test]
fn seed_priority_covers_every_prior_kind() {
    let log = Rc::new(RefCell::new(Vec::new()));

    let holder = SharedValue::new(json!(5));
    let mut n = AnimationNode::from(seed_recorder(Rc::clone(&log)));
    prepare(&mut n, None, Prior::Bound(&holder), Timestamp(0.0));

    let mut n = AnimationNode::from(seed_recorder(Rc::clone(&log)));
    prepare(&mut n, None, Prior::Animated(&json!(6)), Timestamp(0.0));

    let mut n = AnimationNode::from(seed_recorder(Rc::clone(&log)));
    prepare(&mut n, None, Prior::Plain(&json!(7)), Timestamp(0.0));

    let mut n = AnimationNode::from(seed_recorder(Rc::clone(&log)));
    prepare(&mut n, None, Prior::Absent, Timestamp(0.0));

    assert_eq!(
        *log.borrow(),
        vec![json!(5), json!(6), json!(7), json!("declared")]
    );
}

#[test]
fn previous_terminal_is_handed_to_on_start() {
    let saw_previous = Rc::new(Cell::new(false));
    let s = Rc::clone(&saw_previous);
    let mut old = AnimationNode::from(scripted(vec![false]));
    prepare(&mut old, None, Prior::Absent, Timestamp(0.0));

    let mut new = AnimationNode::from(Terminal::from_fns(
        json!(0),
        move |_, _, _, prev| s.set(prev.is_some()),
        |_, _| true,
    ));
    prepare(&mut new, Some(&old), Prior::Absent, Timestamp(1.0));
    assert!(saw_previous.get());
}

#[test]
fn composite_recurses_and_tolerates_shape_drift() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut node = AnimationNode::seq([
        AnimationNode::map([("translateX", AnimationNode::from(seed_recorder(Rc::clone(&log))))]),
        AnimationNode::map([("scale", AnimationNode::from(seed_recorder(Rc::clone(&log))))]),
    ]);
    // Prior only has one element, and its key differs from the node's second element.
    let prior = json!([{ "translateX": 12 }]);
    let previous = AnimationNode::from(json!("not a composite"));
    prepare(&mut node, Some(&previous), Prior::Plain(&prior), Timestamp(0.0));
    assert_eq!(*log.borrow(), vec![json!(12), json!("declared")]);
}

#[test]
fn composite_finishes_only_when_all_children_do() {
    let mut node = AnimationNode::map([
        ("fast", AnimationNode::from(scripted(vec![true]))),
        ("slow", AnimationNode::from(scripted(vec![false, true]))),
        ("fixed", AnimationNode::from(json!("static"))),
    ]);
    prepare(&mut node, None, Prior::Absent, Timestamp(0.0));

    let (done, v) = step(&mut node, Timestamp(16.0), true, &mut Completions::new());
    assert!(!done);
    assert_eq!(v, json!({ "fast": 1, "slow": 1, "fixed": "static" }));

    let (done, v) = step(&mut node, Timestamp(32.0), true, &mut Completions::new());
    assert!(done);
    assert_eq!(v, json!({ "fast": 1, "slow": 2, "fixed": "static" }));
}

#[test]
fn inactive_step_freezes_without_progress_or_callbacks() {
    let hit = Rc::new(Cell::new(false));
    let h = Rc::clone(&hit);
    let mut node = AnimationNode::from(scripted(vec![true]).with_callback(move |_| h.set(true)));
    prepare(&mut node, None, Prior::Plain(&json!(3)), Timestamp(0.0));

    let mut fired = Completions::new();
    let (done, v) = step(&mut node, Timestamp(16.0), false, &mut fired);
    assert!(done);
    assert_eq!(v, json!(3));
    assert!(fired.is_empty());
    fired.run();
    assert!(!hit.get());
    assert!(!node.as_terminal().unwrap().is_finished());
}

#[test]
fn completion_fires_true_once_and_interrupt_fires_false() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let c1 = Rc::clone(&calls);
    let c2 = Rc::clone(&calls);
    let mut done_node =
        AnimationNode::from(scripted(vec![true]).with_callback(move |f| c1.borrow_mut().push(f)));
    let mut running =
        AnimationNode::from(scripted(vec![false]).with_callback(move |f| c2.borrow_mut().push(f)));
    prepare(&mut done_node, None, Prior::Absent, Timestamp(0.0));
    prepare(&mut running, None, Prior::Absent, Timestamp(0.0));

    let mut fired = Completions::new();
    step(&mut done_node, Timestamp(1.0), true, &mut fired);
    step(&mut done_node, Timestamp(2.0), true, &mut fired);
    step(&mut running, Timestamp(1.0), true, &mut fired);
    interrupt(&mut done_node, &mut fired);
    interrupt(&mut running, &mut fired);
    interrupt(&mut running, &mut fired);

    // Nothing runs until the collected callbacks are fired.
    assert!(calls.borrow().is_empty());
    assert_eq!(fired.len(), 2);
    fired.run();
    assert_eq!(*calls.borrow(), vec![true, false]);
}

#[test]
fn unprepared_terminal_starts_from_declared_value() {
    let mut node = AnimationNode::from(scripted(vec![false]));
    let (_, v) = step(&mut node, Timestamp(5.0), true, &mut Completions::new());
    assert_eq!(v, json!(1));
}

#[test]
fn snapshot_mirrors_shape() {
    let node = AnimationNode::map([
        ("a", AnimationNode::from(json!(1))),
        ("b", AnimationNode::seq([AnimationNode::from(timing(json!(9), 1.0, Ease::Linear))])),
    ]);
    assert_eq!(snapshot(&node), json!({ "a": 1, "b": [9] }));
}
