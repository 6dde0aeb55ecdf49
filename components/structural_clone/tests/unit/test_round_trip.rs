//! Lossy behavior of the serialize round-trip tier

use structural_clone::{DeepClone, HostCapabilities, Tier, Value};

fn round_trip_only() -> DeepClone {
    DeepClone::probe(&HostCapabilities::default().without_structured_clone())
}

#[test]
fn test_function_member_is_dropped() {
    let input = Value::object_from(vec![
        ("id", Value::number(7.0)),
        ("name", Value::string("dept")),
        ("f", Value::function("f", |_| Value::number(1.0))),
    ]);

    let outcome = round_trip_only().clone_traced(&input);
    assert_eq!(outcome.tier, Tier::RoundTrip);
    assert!(!outcome.value.has("f"));
    assert_eq!(outcome.value.get("id").unwrap().as_number(), Some(7.0));
    assert_eq!(outcome.value.get("name").unwrap().as_str(), Some("dept"));
}

#[test]
fn test_undefined_and_function_members() {
    // { a: undefined, f: () => 1 }
    let input = Value::object_from(vec![
        ("a", Value::Undefined),
        ("f", Value::function("", |_| Value::number(1.0))),
    ]);

    let output = round_trip_only().clone_value(&input);
    assert!(output.get("a").map_or(true, |a| a.is_null()));
    assert!(!output.has("f"));
}

#[test]
fn test_array_holes_become_null() {
    let input = Value::array_from(vec![
        Value::Undefined,
        Value::function("g", |_| Value::Null),
        Value::number(f64::NAN),
        Value::number(2.0),
    ]);

    let output = round_trip_only().clone_value(&input);
    assert_eq!(output.array_length(), 4);
    assert!(output.index(0).unwrap().is_null());
    assert!(output.index(1).unwrap().is_null());
    assert!(output.index(2).unwrap().is_null());
    assert_eq!(output.index(3).unwrap().as_number(), Some(2.0));
}

#[test]
fn test_dates_become_strings() {
    let input = Value::object_from(vec![("at", Value::date(0.0))]);
    let output = round_trip_only().clone_value(&input);
    assert_eq!(
        output.get("at").unwrap().as_str(),
        Some("1970-01-01T00:00:00.000Z")
    );
}

#[test]
fn test_handle_falls_through_to_round_trip() {
    let input = Value::object_from(vec![
        ("node", Value::handle("HTMLDivElement")),
        ("label", Value::string("chart")),
    ]);

    let outcome = DeepClone::new().clone_traced(&input);
    assert_eq!(outcome.tier, Tier::RoundTrip);
    assert!(outcome.value.get("node").unwrap().deep_equals(&Value::object()));
    assert_eq!(outcome.value.get("label").unwrap().as_str(), Some("chart"));
}
