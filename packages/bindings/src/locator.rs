//! Where a binding's stored value lives.

use std::fmt;

use docbind_core_store::{FieldPath, Snapshot, Value};

use crate::binding::FieldWrite;

/// Reads a binding's stored value out of a snapshot and turns a new
/// stored value into field writes.
pub trait Locator: fmt::Display {
    /// Current stored value. `None` when absent; explicit nulls count as
    /// absent.
    fn read(&self, snapshot: &Snapshot) -> Option<Value>;

    /// Writes that take the document from `remote` to `next`. Empty when
    /// nothing differs.
    fn writes(&self, next: &Value, remote: Option<&Value>) -> Vec<FieldWrite>;
}

/// Stored equality, with `Integer` and `Float` compared by value.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

impl Locator for FieldPath {
    fn read(&self, snapshot: &Snapshot) -> Option<Value> {
        snapshot.field(self).cloned()
    }

    fn writes(&self, next: &Value, remote: Option<&Value>) -> Vec<FieldWrite> {
        if remote.is_some_and(|remote| same_value(remote, next)) {
            return Vec::new();
        }
        vec![FieldWrite {
            path: self.clone(),
            value: next.clone(),
        }]
    }
}

/// A pair stored in two fields, exchanged as a two-element array.
///
/// Without a start path, the first element is never read or written;
/// reads report it as `Null`.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitRange {
    pub start: Option<FieldPath>,
    pub end: FieldPath,
}

impl SplitRange {
    fn element(value: Option<&Value>, index: usize) -> Option<&Value> {
        value?
            .as_array()?
            .get(index)
            .filter(|item| !item.is_null())
    }
}

impl fmt::Display for SplitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.start {
            Some(start) => write!(f, "{}..{}", start, self.end),
            None => write!(f, "..{}", self.end),
        }
    }
}

impl Locator for SplitRange {
    fn read(&self, snapshot: &Snapshot) -> Option<Value> {
        let start = self
            .start
            .as_ref()
            .and_then(|path| snapshot.field(path).cloned());
        let end = snapshot.field(&self.end).cloned();
        if start.is_none() && end.is_none() {
            return None;
        }
        Some(Value::Array(vec![
            start.unwrap_or_default(),
            end.unwrap_or_default(),
        ]))
    }

    fn writes(&self, next: &Value, remote: Option<&Value>) -> Vec<FieldWrite> {
        let targets = [self.start.as_ref(), Some(&self.end)];
        targets
            .into_iter()
            .enumerate()
            .filter_map(|(index, path)| {
                let path = path?;
                let value = Self::element(Some(next), index)?;
                if Self::element(remote, index).is_some_and(|old| same_value(old, value)) {
                    return None;
                }
                Some(FieldWrite {
                    path: path.clone(),
                    value: value.clone(),
                })
            })
            .collect()
    }
}
