//! The Value type - the field tree of a document.

use std::collections::BTreeMap;

use crate::{Error, FieldPath};

/// A dynamically-typed document value.
///
/// Documents are `Map` values at the root. `BTreeMap` keeps field order
/// deterministic so that snapshots compare and print stably.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Explicit null. Bindings treat it the same as an absent field.
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// Build a number, preferring `Integer` when the float is integral.
    ///
    /// Slider positions are computed as floats but usually stored as
    /// integers; normalising here keeps equality checks against the
    /// stored value meaningful.
    pub fn number(n: f64) -> Self {
        if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            Value::Integer(n as i64)
        } else {
            Value::Float(n)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Numeric view of `Integer` and `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get a nested value by field path.
    ///
    /// Returns `None` if any segment is missing or cannot be navigated
    /// (e.g. indexing into a string).
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let mut current = self;
        for segment in path.iter() {
            current = match current {
                Value::Map(map) => map.get(segment)?,
                Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Set a value at a field path, creating intermediate maps as needed.
    ///
    /// A `Null` root is promoted to an empty map first.
    ///
    /// # Errors
    ///
    /// Fails when the path runs through a scalar, or indexes an array out
    /// of bounds (appending at `len` is allowed).
    pub fn set(&mut self, path: &FieldPath, value: Value) -> Result<(), Error> {
        if self.is_null() {
            *self = Value::map();
        }

        let (last, parents) = path
            .segments()
            .split_last()
            .ok_or_else(|| Error::InvalidPath {
                message: "cannot set an empty path".to_string(),
            })?;

        let mut current = self;
        for segment in parents {
            current = match current {
                Value::Map(map) => map.entry(segment.clone()).or_insert_with(Value::map),
                Value::Array(arr) => {
                    let index = parse_index(segment)?;
                    arr.get_mut(index).ok_or_else(|| Error::InvalidPath {
                        message: format!("array index {} out of bounds", index),
                    })?
                }
                _ => {
                    return Err(Error::InvalidPath {
                        message: format!("cannot navigate through non-container at '{}'", segment),
                    })
                }
            };
            if current.is_null() {
                *current = Value::map();
            }
        }

        match current {
            Value::Map(map) => {
                map.insert(last.clone(), value);
                Ok(())
            }
            Value::Array(arr) => {
                let index = parse_index(last)?;
                if index < arr.len() {
                    arr[index] = value;
                } else if index == arr.len() {
                    arr.push(value);
                } else {
                    return Err(Error::InvalidPath {
                        message: format!("array index {} out of bounds", index),
                    });
                }
                Ok(())
            }
            _ => Err(Error::InvalidPath {
                message: format!("cannot set child '{}' on non-container value", last),
            }),
        }
    }

    /// Remove the value at a field path, returning it if it existed.
    pub fn remove(&mut self, path: &FieldPath) -> Option<Value> {
        let parent = match path.parent() {
            Some(parent_path) => self.get_mut(&parent_path)?,
            None => self,
        };
        match parent {
            Value::Map(map) => map.remove(path.leaf()),
            Value::Array(arr) => {
                let index: usize = path.leaf().parse().ok()?;
                (index < arr.len()).then(|| arr.remove(index))
            }
            _ => None,
        }
    }

    fn get_mut(&mut self, path: &FieldPath) -> Option<&mut Value> {
        let mut current = self;
        for segment in path.iter() {
            current = match current {
                Value::Map(map) => map.get_mut(segment)?,
                Value::Array(arr) => arr.get_mut(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

fn parse_index(segment: &str) -> Result<usize, Error> {
    segment.parse().map_err(|_| Error::InvalidPath {
        message: format!("invalid array index: {}", segment),
    })
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}
