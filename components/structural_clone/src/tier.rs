//! Clone tiers and host capability probing
//!
//! A tier is one way of producing a copy. Which tiers exist is decided by
//! probing a [`HostEnvironment`]; each answer is held as a [`Capability`]
//! so an absent tier is an explicit state rather than a missing symbol.

use crate::error::CloneResult;
use crate::json::JsonRoundTrip;
use crate::native::{CloneOptions, StructuredClone};
use crate::value::Value;

/// One strategy in the fallback chain
pub trait CloneTier: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &'static str;

    /// Attempt a deep copy
    fn try_clone(&self, value: &Value) -> CloneResult<Value>;
}

/// Outcome of probing the host for an optional tier
pub enum Capability<T> {
    /// The host provides the tier
    Present(T),
    /// The host does not provide the tier
    Absent,
}

impl<T> Capability<T> {
    /// Whether the tier is available
    pub fn is_present(&self) -> bool {
        matches!(self, Capability::Present(_))
    }

    /// Borrow the tier if present
    pub fn get(&self) -> Option<&T> {
        match self {
            Capability::Present(tier) => Some(tier),
            Capability::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Capability<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(tier) => Capability::Present(tier),
            None => Capability::Absent,
        }
    }
}

/// Boxed tier handle
pub type TierHandle = Box<dyn CloneTier>;

/// The environment queried for optional clone capabilities
pub trait HostEnvironment {
    /// Native structured clone, if the host has one
    fn structured_clone(&self) -> Capability<TierHandle>;

    /// Serialize round-trip, if the host has a textual interchange format
    fn json_round_trip(&self) -> Capability<TierHandle>;
}

/// Configurable host with both tiers present by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Whether structured clone is offered
    pub structured_clone: bool,
    /// Whether the JSON round-trip is offered
    pub json_round_trip: bool,
    /// Options handed to the tiers
    pub options: CloneOptions,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            structured_clone: true,
            json_round_trip: true,
            options: CloneOptions::default(),
        }
    }
}

impl HostCapabilities {
    /// Host without a native structured clone
    pub fn without_structured_clone(mut self) -> Self {
        self.structured_clone = false;
        self
    }

    /// Host without a JSON round-trip
    pub fn without_json_round_trip(mut self) -> Self {
        self.json_round_trip = false;
        self
    }

    /// Replace the tier options
    pub fn with_options(mut self, options: CloneOptions) -> Self {
        self.options = options;
        self
    }
}

impl HostEnvironment for HostCapabilities {
    fn structured_clone(&self) -> Capability<TierHandle> {
        self.structured_clone
            .then(|| Box::new(StructuredClone::new(self.options)) as TierHandle)
            .into()
    }

    fn json_round_trip(&self) -> Capability<TierHandle> {
        self.json_round_trip
            .then(|| Box::new(JsonRoundTrip::new(self.options)) as TierHandle)
            .into()
    }
}
