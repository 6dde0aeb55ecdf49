//! Copy isolation and equality properties of the fallback chain

use structural_clone::{deep_clone, DeepClone, HostCapabilities, Tier, Value};

fn round_trip_only() -> DeepClone {
    DeepClone::probe(&HostCapabilities::default().without_structured_clone())
}

fn sample() -> Value {
    // { a: 1, b: [1, 2, { c: 3 }] }
    Value::object_from(vec![
        ("a", Value::number(1.0)),
        (
            "b",
            Value::array_from(vec![
                Value::number(1.0),
                Value::number(2.0),
                Value::object_from(vec![("c", Value::number(3.0))]),
            ]),
        ),
    ])
}

#[test]
fn test_primitives_are_returned_as_is() {
    let inputs = vec![
        Value::number(42.0),
        Value::number(f64::NAN),
        Value::string("hello"),
        Value::boolean(false),
        Value::Null,
        Value::Undefined,
        Value::bigint(7),
    ];
    for input in inputs {
        let outcome = DeepClone::new().clone_traced(&input);
        assert_eq!(outcome.tier, Tier::Primitive);
        assert!(outcome.value.same_value(&input), "{:?}", input);
    }
}

#[test]
fn test_nested_mutation_is_isolated() {
    let input = sample();
    let output = deep_clone(&input);
    assert!(output.deep_equals(&input));

    output
        .get("b")
        .unwrap()
        .index(2)
        .unwrap()
        .set("c", Value::number(99.0));

    let c = input.get("b").unwrap().index(2).unwrap().get("c").unwrap();
    assert_eq!(c.as_number(), Some(3.0));
}

#[test]
fn test_isolation_holds_in_reverse() {
    let input = sample();
    let output = deep_clone(&input);

    input.get("b").unwrap().push(Value::string("extra"));
    input.set("a", Value::number(2.0));

    assert_eq!(output.get("b").unwrap().array_length(), 3);
    assert_eq!(output.get("a").unwrap().as_number(), Some(1.0));
}

#[test]
fn test_round_trip_tier_also_isolates() {
    let input = sample();
    let outcome = round_trip_only().clone_traced(&input);
    assert_eq!(outcome.tier, Tier::RoundTrip);
    assert!(outcome.value.deep_equals(&input));

    outcome.value.get("b").unwrap().set_index(0, Value::number(10.0));
    assert_eq!(input.get("b").unwrap().index(0).unwrap().as_number(), Some(1.0));
}

#[test]
fn test_cycle_is_cloned_natively() {
    let input = Value::object_from(vec![("name", Value::string("root"))]);
    input.set("self", input.clone());

    let outcome = DeepClone::new().clone_traced(&input);
    assert_eq!(outcome.tier, Tier::Native);
    assert!(outcome.value.deep_equals(&input));
    assert!(!outcome.value.same_value(&input));
    assert!(outcome.value.get("self").unwrap().same_value(&outcome.value));
}

#[test]
fn test_idempotence() {
    let inputs = vec![
        sample(),
        Value::array_from(vec![Value::map_from(vec![(
            Value::number(1.0),
            Value::set_from(vec![Value::string("x")]),
        )])]),
        Value::object_from(vec![("when", Value::date(86_400_000.0))]),
    ];
    for input in inputs {
        let once = deep_clone(&input);
        let twice = deep_clone(&once);
        assert!(twice.deep_equals(&once));
    }
}

#[test]
fn test_idempotence_through_round_trip() {
    let cloner = round_trip_only();
    let input = Value::object_from(vec![
        ("f", Value::function("f", |_| Value::Null)),
        ("n", Value::number(f64::INFINITY)),
        ("list", Value::array_from(vec![Value::Undefined, Value::number(1.0)])),
    ]);
    let once = cloner.clone_value(&input);
    let twice = cloner.clone_value(&once);
    assert!(twice.deep_equals(&once));
}

#[test]
fn test_shared_children_stay_shared_natively() {
    let shared = Value::array_from(vec![Value::number(1.0)]);
    let input = Value::object_from(vec![("x", shared.clone()), ("y", shared)]);

    let output = deep_clone(&input);
    let (x, y) = (output.get("x").unwrap(), output.get("y").unwrap());
    assert!(x.same_value(&y));
    assert!(!x.same_value(&input.get("x").unwrap()));
}

#[test]
fn test_depth_limit_falls_through() {
    let mut value = Value::object();
    for _ in 0..30 {
        value = Value::object_from(vec![("next", value)]);
    }
    let cloner = DeepClone::with_options(structural_clone::CloneOptions { max_depth: 10 });
    let outcome = cloner.clone_traced(&value);
    assert_eq!(outcome.tier, Tier::Identity);
    assert!(outcome.value.same_value(&value));
}
