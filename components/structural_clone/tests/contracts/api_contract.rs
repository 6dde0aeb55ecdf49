//! Contract: the driver always returns a usable value and every tier obeys
//! the `CloneTier` result contract.

use structural_clone::{
    Capability, CloneError, CloneTier, DeepClone, HostCapabilities, HostEnvironment,
    JsonRoundTrip, StructuredClone, Tier, TierHandle, Value,
};

/// A host whose native cloner always fails, as with an unsupported shape
struct FailingNativeHost;

struct AlwaysFails;

impl CloneTier for AlwaysFails {
    fn name(&self) -> &'static str {
        "always_fails"
    }

    fn try_clone(&self, _value: &Value) -> Result<Value, CloneError> {
        Err(CloneError::DataClone("unsupported".to_string()))
    }
}

impl HostEnvironment for FailingNativeHost {
    fn structured_clone(&self) -> Capability<TierHandle> {
        Capability::Present(Box::new(AlwaysFails))
    }

    fn json_round_trip(&self) -> Capability<TierHandle> {
        HostCapabilities::default().json_round_trip()
    }
}

#[test]
fn test_custom_host_failure_falls_through() {
    let input = Value::object_from(vec![("a", Value::number(1.0))]);
    let outcome = DeepClone::probe(&FailingNativeHost).clone_traced(&input);
    assert_eq!(outcome.tier, Tier::RoundTrip);
    assert!(outcome.value.deep_equals(&input));
}

#[test]
fn test_every_input_yields_a_value() {
    let cyclic = Value::array();
    cyclic.push(cyclic.clone());

    let inputs = vec![
        Value::Undefined,
        Value::object(),
        cyclic,
        Value::handle("file descriptor"),
        Value::object_from(vec![("big", Value::bigint(3))]),
    ];
    let hosts = [
        HostCapabilities::default(),
        HostCapabilities::default().without_structured_clone(),
        HostCapabilities::default().without_json_round_trip(),
        HostCapabilities::default()
            .without_structured_clone()
            .without_json_round_trip(),
    ];

    for host in &hosts {
        let cloner = DeepClone::probe(host);
        for input in &inputs {
            let outcome = cloner.clone_traced(input);
            match outcome.tier {
                Tier::Primitive | Tier::Identity => assert!(outcome.value.same_value(input)),
                Tier::Native => assert!(outcome.value.deep_equals(input)),
                Tier::RoundTrip => assert!(!outcome.value.same_value(input)),
            }
        }
    }
}

#[test]
fn test_tiers_report_errors_instead_of_panicking() {
    let cyclic = Value::object();
    cyclic.set("loop", cyclic.clone());

    assert!(StructuredClone::default().try_clone(&cyclic).is_ok());
    assert_eq!(
        JsonRoundTrip::default().try_clone(&cyclic).unwrap_err(),
        CloneError::CircularReference
    );
}

#[test]
fn test_handle_alone_round_trips_to_empty_object() {
    let outcome = DeepClone::new().clone_traced(&Value::handle("canvas"));
    assert_eq!(outcome.tier, Tier::RoundTrip);
    assert!(outcome.value.deep_equals(&Value::object()));
}
