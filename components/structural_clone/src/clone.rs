//! Deep clone driver
//!
//! Runs the fallback chain: primitive short-circuit, structured clone,
//! JSON round-trip, and finally the original reference. Tier failures are
//! absorbed; only exhausting every tier is reported, as a warning.

use serde::Serialize;
use std::fmt;

use crate::error::CloneError;
use crate::tier::{Capability, HostCapabilities, HostEnvironment, TierHandle};
use crate::value::Value;
use crate::CloneOptions;

/// Prefix of the diagnostic emitted when no tier produced a copy
pub const FALLBACK_WARNING: &str = "deep clone failed, returning the original reference";

/// Which step of the chain produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Input was a primitive and returned unchanged
    Primitive,
    /// Native structured clone
    Native,
    /// Serialize round-trip
    RoundTrip,
    /// Every tier failed; the input reference was returned
    Identity,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Primitive => "primitive",
            Tier::Native => "native",
            Tier::RoundTrip => "round_trip",
            Tier::Identity => "identity",
        };
        write!(f, "{}", name)
    }
}

/// A cloned value together with the tier that produced it
#[derive(Debug, Clone)]
pub struct CloneOutcome {
    /// The copy, or the input itself for `Primitive` and `Identity`
    pub value: Value,
    /// Tier that produced `value`
    pub tier: Tier,
}

/// Deep clone with an ordered fallback chain
pub struct DeepClone {
    native: Capability<TierHandle>,
    round_trip: Capability<TierHandle>,
}

impl Default for DeepClone {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DeepClone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepClone")
            .field("native", &self.native.get().map(|t| t.name()))
            .field("round_trip", &self.round_trip.get().map(|t| t.name()))
            .finish()
    }
}

impl DeepClone {
    /// Driver for the default host: both tiers present
    pub fn new() -> Self {
        Self::probe(&HostCapabilities::default())
    }

    /// Driver for the default host with custom tier options
    pub fn with_options(options: CloneOptions) -> Self {
        Self::probe(&HostCapabilities::default().with_options(options))
    }

    /// Build a driver from whatever the host provides
    pub fn probe(host: &dyn HostEnvironment) -> Self {
        Self {
            native: host.structured_clone(),
            round_trip: host.json_round_trip(),
        }
    }

    /// Assemble a driver from explicit tiers
    pub fn from_tiers(native: Capability<TierHandle>, round_trip: Capability<TierHandle>) -> Self {
        Self { native, round_trip }
    }

    /// Deep copy of `value`; never fails
    pub fn clone_value(&self, value: &Value) -> Value {
        self.clone_traced(value).value
    }

    /// Deep copy of `value` with the tier that produced it
    pub fn clone_traced(&self, value: &Value) -> CloneOutcome {
        if !value.is_container() {
            return CloneOutcome {
                value: value.clone(),
                tier: Tier::Primitive,
            };
        }

        let mut last_error: Option<CloneError> = None;

        for (tier, capability) in [(Tier::Native, &self.native), (Tier::RoundTrip, &self.round_trip)] {
            let Some(handle) = capability.get() else {
                continue;
            };
            match handle.try_clone(value) {
                Ok(copy) => return CloneOutcome { value: copy, tier },
                Err(e) => {
                    tracing::debug!(tier = handle.name(), error = %e, "clone tier failed, falling through");
                    last_error = Some(e);
                }
            }
        }

        let detail = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no clone capability available".to_string());
        tracing::warn!(
            kind = value.type_name(),
            address = value.identity().unwrap_or_default(),
            error = %detail,
            "{}",
            FALLBACK_WARNING
        );

        CloneOutcome {
            value: value.clone(),
            tier: Tier::Identity,
        }
    }
}

/// Deep copy using the default host
pub fn deep_clone(value: &Value) -> Value {
    DeepClone::new().clone_value(value)
}
