//! Environment-aware deep clone for dynamic values.
//!
//! This crate copies arbitrary, possibly cyclic value graphs through an
//! ordered fallback chain and never fails the caller.
//!
//! # Overview
//!
//! - [`Value`] - Dynamic value with shared, mutable containers
//! - [`DeepClone`] - Driver running the fallback chain
//! - [`StructuredClone`] - Graph-aware native copy (handles cycles)
//! - [`JsonRoundTrip`] - Lossy copy through JSON text
//! - [`HostEnvironment`] - Capability probe deciding which tiers exist
//!
//! # Examples
//!
//! ```
//! use structural_clone::{deep_clone, Value};
//!
//! let original = Value::object_from(vec![
//!     ("a", Value::number(1.0)),
//!     ("b", Value::array_from(vec![Value::number(1.0), Value::number(2.0)])),
//! ]);
//!
//! let copy = deep_clone(&original);
//! assert!(copy.deep_equals(&original));
//!
//! copy.get("b").unwrap().push(Value::number(3.0));
//! assert_eq!(original.get("b").unwrap().array_length(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod clone;
mod error;
pub mod json;
pub mod native;
pub mod tier;
pub mod value;

pub use clone::{deep_clone, CloneOutcome, DeepClone, Tier, FALLBACK_WARNING};
pub use error::{CloneError, CloneResult};
pub use json::{JsonCodec, JsonRoundTrip};
pub use native::{CloneOptions, StructuredClone, DEFAULT_MAX_DEPTH};
pub use tier::{Capability, CloneTier, HostCapabilities, HostEnvironment, TierHandle};
pub use value::Value;
