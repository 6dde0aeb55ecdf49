//! Dynamic value representation
//!
//! Containers live behind `Rc<RefCell<..>>` so a value graph can alias and
//! refer back to itself, the same way objects do on a script heap.

use num_bigint::BigInt;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Insertion-ordered string-keyed properties
#[derive(Debug, Clone, Default)]
pub struct ObjectData {
    /// Properties in insertion order
    pub properties: Vec<(String, Value)>,
}

impl ObjectData {
    /// Look up a property by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or overwrite a property, keeping its original position
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((key, value)),
        }
    }

    /// Remove a property, returning its previous value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.properties.iter().position(|(k, _)| k == key)?;
        Some(self.properties.remove(pos).1)
    }
}

/// Array elements
#[derive(Debug, Clone, Default)]
pub struct ArrayData {
    /// Elements in index order
    pub elements: Vec<Value>,
}

/// Map entries in insertion order
#[derive(Debug, Clone, Default)]
pub struct MapData {
    /// Key/value pairs
    pub entries: Vec<(Value, Value)>,
}

impl MapData {
    /// Insert or overwrite an entry; keys compare with same-value semantics
    pub fn insert(&mut self, key: Value, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k.same_value(&key)) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up an entry
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.same_value(key))
            .map(|(_, v)| v)
    }
}

/// Set values in insertion order
#[derive(Debug, Clone, Default)]
pub struct SetData {
    /// Members
    pub values: Vec<Value>,
}

impl SetData {
    /// Add a member unless an identical one is present
    pub fn add(&mut self, value: Value) {
        if !self.has(&value) {
            self.values.push(value);
        }
    }

    /// Membership check with same-value semantics
    pub fn has(&self, value: &Value) -> bool {
        self.values.iter().any(|v| v.same_value(value))
    }
}

/// A point in time as milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy)]
pub struct DateData {
    /// Epoch milliseconds; NaN marks an invalid date
    pub time: f64,
}

/// Largest representable distance from the epoch, in milliseconds
const MAX_TIME_MS: f64 = 8.64e15;

impl DateData {
    /// Date for `time` after time clipping: integral milliseconds, truncated
    /// toward zero, NaN outside the representable range
    pub fn clipped(time: f64) -> Self {
        let time = if time.is_finite() && time.abs() <= MAX_TIME_MS {
            time.trunc() + 0.0
        } else {
            f64::NAN
        };
        Self { time }
    }

    /// Whether the date holds a representable time
    pub fn is_valid(&self) -> bool {
        self.time.is_finite() && self.time.abs() <= MAX_TIME_MS
    }

    /// ISO-8601 rendering with millisecond precision, `None` when invalid
    pub fn to_iso_string(&self) -> Option<String> {
        if !self.is_valid() {
            return None;
        }
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.time as i64)
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
    }
}

/// A live callable
pub struct FunctionData {
    /// Function name, empty for anonymous functions
    pub name: String,
    func: Box<dyn Fn(&[Value]) -> Value>,
}

impl FunctionData {
    /// Invoke the function
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for FunctionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionData").field("name", &self.name).finish()
    }
}

/// An opaque reference to a resource owned outside the value graph
#[derive(Debug)]
pub struct HandleData {
    /// What the handle refers to
    pub description: String,
}

/// Any value that can be cloned
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// Arbitrary precision integer
    BigInt(BigInt),
    /// String value
    String(String),
    /// Function reference
    Function(Rc<FunctionData>),
    /// Object with properties
    Object(Rc<RefCell<ObjectData>>),
    /// Array
    Array(Rc<RefCell<ArrayData>>),
    /// Map collection
    Map(Rc<RefCell<MapData>>),
    /// Set collection
    Set(Rc<RefCell<SetData>>),
    /// Date object
    Date(Rc<RefCell<DateData>>),
    /// Raw byte buffer
    Bytes(Rc<RefCell<Vec<u8>>>),
    /// External resource handle
    Handle(Rc<HandleData>),
}

impl Value {
    /// Create number value
    pub fn number(v: f64) -> Self {
        Value::Number(v)
    }

    /// Create string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create boolean value
    pub fn boolean(v: bool) -> Self {
        Value::Boolean(v)
    }

    /// Create BigInt value
    pub fn bigint(v: impl Into<BigInt>) -> Self {
        Value::BigInt(v.into())
    }

    /// Create empty object
    pub fn object() -> Self {
        Value::Object(Rc::new(RefCell::new(ObjectData::default())))
    }

    /// Create object from key/value pairs
    pub fn object_from<K: Into<String>>(props: Vec<(K, Value)>) -> Self {
        let mut data = ObjectData::default();
        for (k, v) in props {
            data.insert(k, v);
        }
        Value::Object(Rc::new(RefCell::new(data)))
    }

    /// Create empty array
    pub fn array() -> Self {
        Value::array_from(Vec::new())
    }

    /// Create array from values
    pub fn array_from(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(ArrayData { elements })))
    }

    /// Create Map from entries
    pub fn map_from(entries: Vec<(Value, Value)>) -> Self {
        let mut data = MapData::default();
        for (k, v) in entries {
            data.insert(k, v);
        }
        Value::Map(Rc::new(RefCell::new(data)))
    }

    /// Create Set from values
    pub fn set_from(values: Vec<Value>) -> Self {
        let mut data = SetData::default();
        for v in values {
            data.add(v);
        }
        Value::Set(Rc::new(RefCell::new(data)))
    }

    /// Create Date from epoch milliseconds
    pub fn date(time: f64) -> Self {
        Value::Date(Rc::new(RefCell::new(DateData::clipped(time))))
    }

    /// Create byte buffer
    pub fn bytes(data: Vec<u8>) -> Self {
        Value::Bytes(Rc::new(RefCell::new(data)))
    }

    /// Create a function value
    pub fn function<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
    {
        Value::Function(Rc::new(FunctionData {
            name: name.into(),
            func: Box::new(func),
        }))
    }

    /// Create an external resource handle
    pub fn handle(description: impl Into<String>) -> Self {
        Value::Handle(Rc::new(HandleData {
            description: description.into(),
        }))
    }

    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is a function
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Whether the value is an allocated container that a copy must duplicate.
    ///
    /// Functions are callables, not containers, and are passed through as-is.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Object(_)
                | Value::Array(_)
                | Value::Map(_)
                | Value::Set(_)
                | Value::Date(_)
                | Value::Bytes(_)
                | Value::Handle(_)
        )
    }

    /// Short kind label
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Date(_) => "date",
            Value::Bytes(_) => "bytes",
            Value::Handle(_) => "handle",
        }
    }

    /// Get the reference identity of the value
    ///
    /// Returns Some(address) for reference types, None for primitives.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Function(rc) => Some(Rc::as_ptr(rc) as usize),
            Value::Object(rc) => Some(Rc::as_ptr(rc) as usize),
            Value::Array(rc) => Some(Rc::as_ptr(rc) as usize),
            Value::Map(rc) => Some(Rc::as_ptr(rc) as usize),
            Value::Set(rc) => Some(Rc::as_ptr(rc) as usize),
            Value::Date(rc) => Some(Rc::as_ptr(rc) as usize),
            Value::Bytes(rc) => Some(Rc::as_ptr(rc) as usize),
            Value::Handle(rc) => Some(Rc::as_ptr(rc) as usize),
            Value::Undefined
            | Value::Null
            | Value::Boolean(_)
            | Value::Number(_)
            | Value::BigInt(_)
            | Value::String(_) => None,
        }
    }

    /// `Object.is` semantics: primitives by value, references by address.
    ///
    /// NaN is the same value as NaN, +0 is not the same value as -0.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => same_number(*a, *b),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b && self.type_name() == other.type_name(),
                _ => false,
            },
        }
    }

    /// Structural equality across the whole graph.
    ///
    /// Cycles are handled by assuming equality for container pairs already
    /// under comparison. Object properties match by key in any order; array,
    /// map and set members match in order. Functions and handles compare by
    /// identity.
    pub fn deep_equals(&self, other: &Value) -> bool {
        let mut seen = HashSet::new();
        deep_equals_inner(self, other, &mut seen)
    }

    /// Get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get an object property
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Whether an object has an own property
    pub fn has(&self, key: &str) -> bool {
        match self {
            Value::Object(obj) => obj.borrow().get(key).is_some(),
            _ => false,
        }
    }

    /// Set an object property; no-op on non-objects
    pub fn set(&self, key: impl Into<String>, value: Value) {
        if let Value::Object(obj) = self {
            obj.borrow_mut().insert(key, value);
        }
    }

    /// Get an array element
    pub fn index(&self, i: usize) -> Option<Value> {
        match self {
            Value::Array(arr) => arr.borrow().elements.get(i).cloned(),
            _ => None,
        }
    }

    /// Overwrite an array element; returns false when out of range
    pub fn set_index(&self, i: usize, value: Value) -> bool {
        match self {
            Value::Array(arr) => match arr.borrow_mut().elements.get_mut(i) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Append to an array; no-op on non-arrays
    pub fn push(&self, value: Value) {
        if let Value::Array(arr) = self {
            arr.borrow_mut().elements.push(value);
        }
    }

    /// Array length, 0 for non-arrays
    pub fn array_length(&self) -> usize {
        match self {
            Value::Array(arr) => arr.borrow().elements.len(),
            _ => 0,
        }
    }

    /// Look up a Map entry
    pub fn map_get(&self, key: &Value) -> Option<Value> {
        match self {
            Value::Map(map) => map.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Insert a Map entry; no-op on non-maps
    pub fn map_insert(&self, key: Value, value: Value) {
        if let Value::Map(map) = self {
            map.borrow_mut().insert(key, value);
        }
    }

    /// Add a Set member; no-op on non-sets
    pub fn set_add(&self, value: Value) {
        if let Value::Set(set) = self {
            set.borrow_mut().add(value);
        }
    }

    /// Set membership
    pub fn set_has(&self, value: &Value) -> bool {
        match self {
            Value::Set(set) => set.borrow().has(value),
            _ => false,
        }
    }

    /// Epoch milliseconds of a Date
    pub fn date_time(&self) -> Option<f64> {
        match self {
            Value::Date(date) => Some(date.borrow().time),
            _ => None,
        }
    }

    /// Move a Date to another time; no-op on non-dates
    pub fn set_date_time(&self, time: f64) {
        if let Value::Date(date) = self {
            *date.borrow_mut() = DateData::clipped(time);
        }
    }
}

fn same_number(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    a == b && a.is_sign_negative() == b.is_sign_negative()
}

fn deep_equals_inner(a: &Value, b: &Value, seen: &mut HashSet<(usize, usize)>) -> bool {
    if let (Some(x), Some(y)) = (a.identity(), b.identity()) {
        if !seen.insert((x, y)) {
            return true;
        }
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Handle(x), Value::Handle(y)) => Rc::ptr_eq(x, y),
        (Value::Object(x), Value::Object(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.properties.len() == y.properties.len()
                && x.properties.iter().all(|(k, v)| {
                    y.get(k)
                        .map_or(false, |other| deep_equals_inner(v, other, seen))
                })
        }
        (Value::Array(x), Value::Array(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.elements.len() == y.elements.len()
                && x.elements
                    .iter()
                    .zip(y.elements.iter())
                    .all(|(l, r)| deep_equals_inner(l, r, seen))
        }
        (Value::Map(x), Value::Map(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.entries.len() == y.entries.len()
                && x.entries.iter().zip(y.entries.iter()).all(|((lk, lv), (rk, rv))| {
                    deep_equals_inner(lk, rk, seen) && deep_equals_inner(lv, rv, seen)
                })
        }
        (Value::Set(x), Value::Set(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.values.len() == y.values.len()
                && x.values
                    .iter()
                    .zip(y.values.iter())
                    .all(|(l, r)| deep_equals_inner(l, r, seen))
        }
        (Value::Date(x), Value::Date(y)) => {
            let (x, y) = (x.borrow().time, y.borrow().time);
            (x.is_nan() && y.is_nan()) || x == y
        }
        (Value::Bytes(x), Value::Bytes(y)) => *x.borrow() == *y.borrow(),
        _ => a.same_value(b),
    }
}

/// Format a number the way script consoles print it
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        let s = if n.is_sign_negative() { "-0" } else { "0" };
        s.to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form with an explicit sign, as in 1e+21 and 1e-7
        let s = format!("{:e}", n);
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => s,
        }
    } else {
        format!("{}", n)
    }
}

fn render(value: &Value, f: &mut fmt::Formatter<'_>, path: &mut Vec<usize>, nested: bool) -> fmt::Result {
    if let Some(id) = value.identity() {
        if path.contains(&id) {
            return write!(f, "[Circular]");
        }
    }

    match value {
        Value::Undefined => write!(f, "undefined"),
        Value::Null => write!(f, "null"),
        Value::Boolean(b) => write!(f, "{}", b),
        Value::Number(n) => write!(f, "{}", format_number(*n)),
        Value::BigInt(n) => write!(f, "{}n", n),
        Value::String(s) if nested => write!(f, "'{}'", s),
        Value::String(s) => write!(f, "{}", s),
        Value::Function(func) if func.name.is_empty() => write!(f, "[Function (anonymous)]"),
        Value::Function(func) => write!(f, "[Function: {}]", func.name),
        Value::Handle(handle) => write!(f, "[Handle: {}]", handle.description),
        Value::Date(date) => match date.borrow().to_iso_string() {
            Some(iso) => write!(f, "{}", iso),
            None => write!(f, "Invalid Date"),
        },
        Value::Bytes(bytes) => write!(f, "ArrayBuffer {{ byteLength: {} }}", bytes.borrow().len()),
        Value::Object(obj) => {
            let obj = obj.borrow();
            if obj.properties.is_empty() {
                return write!(f, "{{}}");
            }
            path.push(value.identity().unwrap_or_default());
            write!(f, "{{ ")?;
            for (i, (k, v)) in obj.properties.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", k)?;
                render(v, f, path, true)?;
            }
            path.pop();
            write!(f, " }}")
        }
        Value::Array(arr) => {
            let arr = arr.borrow();
            if arr.elements.is_empty() {
                return write!(f, "[]");
            }
            path.push(value.identity().unwrap_or_default());
            write!(f, "[ ")?;
            for (i, v) in arr.elements.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                render(v, f, path, true)?;
            }
            path.pop();
            write!(f, " ]")
        }
        Value::Map(map) => {
            let map = map.borrow();
            write!(f, "Map({})", map.entries.len())?;
            if map.entries.is_empty() {
                return write!(f, " {{}}");
            }
            path.push(value.identity().unwrap_or_default());
            write!(f, " {{ ")?;
            for (i, (k, v)) in map.entries.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                render(k, f, path, true)?;
                write!(f, " => ")?;
                render(v, f, path, true)?;
            }
            path.pop();
            write!(f, " }}")
        }
        Value::Set(set) => {
            let set = set.borrow();
            write!(f, "Set({})", set.values.len())?;
            if set.values.is_empty() {
                return write!(f, " {{}}");
            }
            path.push(value.identity().unwrap_or_default());
            write!(f, " {{ ")?;
            for (i, v) in set.values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                render(v, f, path, true)?;
            }
            path.pop();
            write!(f, " }}")
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, f, &mut Vec::new(), false)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, f, &mut Vec::new(), true)
    }
}
