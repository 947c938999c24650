use super::*;

fn producer(source: &str, captured: Vec<DepValue>) -> Producer {
    Producer::new("p", source, || None).capturing(captured)
}

#[test]
fn nan_is_self_equal_and_zero_sign_matters() {
    let a = Fingerprint(vec![1.0.into(), f64::NAN.into(), (-0.0).into()]);
    let b = Fingerprint(vec![1.0.into(), f64::NAN.into(), 0.0.into()]);
    assert!(!equal(Some(&a), Some(&b)));

    let c = Fingerprint(vec![1.0.into(), f64::NAN.into()]);
    let d = Fingerprint(vec![1.0.into(), f64::NAN.into()]);
    assert!(equal(Some(&c), Some(&d)));
}

#[test]
fn absent_or_length_mismatch_is_unequal() {
    let a = Fingerprint(vec![DepValue::Null]);
    assert!(!equal(None, Some(&a)));
    assert!(!equal(Some(&a), None));
    assert!(!equal(None, None));
    let b = Fingerprint(vec![DepValue::Null, DepValue::Null]);
    assert!(!equal(Some(&a), Some(&b)));
}

#[test]
fn derived_fingerprint_tracks_source_and_captures() {
    let a = producer("return {opacity: x}", vec![DepValue::from(1.0)]);
    let same = producer("return {opacity: x}", vec![DepValue::from(1.0)]);
    let other_capture = producer("return {opacity: x}", vec![DepValue::from(2.0)]);
    let other_source = producer("return {opacity: y}", vec![DepValue::from(1.0)]);

    let fa = fingerprint(None, &[&a]);
    assert!(equal(Some(&fa), Some(&fingerprint(None, &[&same]))));
    assert!(!equal(Some(&fa), Some(&fingerprint(None, &[&other_capture]))));
    assert!(!equal(Some(&fa), Some(&fingerprint(None, &[&other_source]))));
}

#[test]
fn explicit_deps_get_a_source_sentinel() {
    let a = producer("v1", vec![]);
    let edited = producer("v2", vec![]);
    let deps = vec![DepValue::from("theme-dark")];

    let fa = fingerprint(Some(deps.clone()), &[&a]);
    assert_eq!(fa.tokens().len(), 2);
    assert_eq!(fa.tokens()[1], DepValue::Hash(aggregate_hash(&[&a])));
    assert!(equal(Some(&fa), Some(&fingerprint(Some(deps.clone()), &[&a]))));
    assert!(!equal(Some(&fa), Some(&fingerprint(Some(deps), &[&edited]))));
}

#[test]
fn content_hash_is_stable_and_length_prefixed() {
    assert_eq!(content_hash("abc"), content_hash("abc"));
    assert_ne!(content_hash("abc"), content_hash("abd"));
    assert_ne!(aggregate_hash(&[]), content_hash(""));
}

#[test]
fn json_values_convert_structurally() {
    let v = serde_json::json!({ "k": [1, "x", null, true] });
    let d = DepValue::from(&v);
    assert_eq!(
        d,
        DepValue::List(vec![DepValue::List(vec![
            DepValue::Text("k".into()),
            DepValue::List(vec![
                DepValue::Number(1.0),
                DepValue::Text("x".into()),
                DepValue::Null,
                DepValue::Bool(true),
            ]),
        ])])
    );
}
