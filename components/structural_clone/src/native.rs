//! Structured clone tier
//!
//! Graph-aware copy in the manner of the HTML structured clone algorithm:
//! every container is recorded in a memory map before its members are
//! copied, so shared members stay shared in the copy and cycles are
//! reproduced instead of followed forever.
//!
//! Reference: https://html.spec.whatwg.org/multipage/structured-data.html

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{CloneError, CloneResult};
use crate::tier::CloneTier;
use crate::value::{ArrayData, MapData, ObjectData, SetData, Value};

/// Default nesting limit; the tiers recurse once per level, and this bound
/// keeps a debug build inside a 2 MiB thread stack.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Options for structured cloning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneOptions {
    /// Maximum container nesting depth.
    ///
    /// Both tiers recurse per level, so raising this needs a larger stack.
    pub max_depth: usize,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Structured clone context for tracking references
struct StructuredCloneContext {
    /// Map from source container identity to its copy
    memory: HashMap<usize, Value>,
    /// Current recursion depth
    depth: usize,
    options: CloneOptions,
}

impl StructuredCloneContext {
    fn new(options: CloneOptions) -> Self {
        Self {
            memory: HashMap::new(),
            depth: 0,
            options,
        }
    }

    /// Copy already produced for a source container, if any
    fn lookup(&self, value: &Value) -> Option<Value> {
        value.identity().and_then(|id| self.memory.get(&id).cloned())
    }

    /// Record the copy of a source container before descending into it
    fn register(&mut self, source: &Value, copy: &Value) {
        if let Some(id) = source.identity() {
            self.memory.insert(id, copy.clone());
        }
    }

    fn enter(&mut self) -> CloneResult<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(CloneError::MaxDepthExceeded);
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// The structured clone algorithm as a tier
#[derive(Debug, Clone, Default)]
pub struct StructuredClone {
    options: CloneOptions,
}

impl StructuredClone {
    /// Create with the given options
    pub fn new(options: CloneOptions) -> Self {
        Self { options }
    }

    /// Clone a value, failing on members that cannot be reproduced
    pub fn clone_value(&self, value: &Value) -> CloneResult<Value> {
        let mut ctx = StructuredCloneContext::new(self.options);
        Self::clone_internal(value, &mut ctx)
    }

    fn clone_internal(value: &Value, ctx: &mut StructuredCloneContext) -> CloneResult<Value> {
        if let Some(copy) = ctx.lookup(value) {
            return Ok(copy);
        }

        match value {
            // Primitives are immutable and shared as-is
            Value::Undefined
            | Value::Null
            | Value::Boolean(_)
            | Value::Number(_)
            | Value::BigInt(_)
            | Value::String(_) => Ok(value.clone()),

            Value::Function(func) => {
                let name = if func.name.is_empty() { "anonymous" } else { func.name.as_str() };
                Err(CloneError::DataClone(format!(
                    "function {} could not be cloned",
                    name
                )))
            }
            Value::Handle(handle) => Err(CloneError::DataClone(format!(
                "{} could not be cloned",
                handle.description
            ))),

            Value::Date(date) => {
                let copy = Value::Date(Rc::new(RefCell::new(*date.borrow())));
                ctx.register(value, &copy);
                Ok(copy)
            }
            Value::Bytes(bytes) => {
                let copy = Value::Bytes(Rc::new(RefCell::new(bytes.borrow().clone())));
                ctx.register(value, &copy);
                Ok(copy)
            }

            Value::Object(obj) => {
                let target = Rc::new(RefCell::new(ObjectData::default()));
                let copy = Value::Object(Rc::clone(&target));
                ctx.register(value, &copy);
                let props = obj.borrow().properties.clone();

                ctx.enter()?;
                for (key, member) in &props {
                    let member = Self::clone_internal(member, ctx)?;
                    target.borrow_mut().properties.push((key.clone(), member));
                }
                ctx.exit();
                Ok(copy)
            }
            Value::Array(arr) => {
                let target = Rc::new(RefCell::new(ArrayData::default()));
                let copy = Value::Array(Rc::clone(&target));
                ctx.register(value, &copy);
                let elements = arr.borrow().elements.clone();

                ctx.enter()?;
                for element in &elements {
                    let element = Self::clone_internal(element, ctx)?;
                    target.borrow_mut().elements.push(element);
                }
                ctx.exit();
                Ok(copy)
            }
            Value::Map(map) => {
                let target = Rc::new(RefCell::new(MapData::default()));
                let copy = Value::Map(Rc::clone(&target));
                ctx.register(value, &copy);
                let entries = map.borrow().entries.clone();

                ctx.enter()?;
                for (k, v) in &entries {
                    let k = Self::clone_internal(k, ctx)?;
                    let v = Self::clone_internal(v, ctx)?;
                    target.borrow_mut().entries.push((k, v));
                }
                ctx.exit();
                Ok(copy)
            }
            Value::Set(set) => {
                let target = Rc::new(RefCell::new(SetData::default()));
                let copy = Value::Set(Rc::clone(&target));
                ctx.register(value, &copy);
                let values = set.borrow().values.clone();

                ctx.enter()?;
                for member in &values {
                    let member = Self::clone_internal(member, ctx)?;
                    target.borrow_mut().values.push(member);
                }
                ctx.exit();
                Ok(copy)
            }
        }
    }
}

impl CloneTier for StructuredClone {
    fn name(&self) -> &'static str {
        "structured_clone"
    }

    fn try_clone(&self, value: &Value) -> CloneResult<Value> {
        self.clone_value(value)
    }
}
