/// Order compilation
///
/// Builds a composite comparator from the `orderBy` keys. The first key is
/// primary; each later key only breaks ties left by the keys before it.
use super::request::{SortDirection, SortKey};
use super::selector::{resolve, ResolvedSelector};
use crate::error::Result;
use crate::schema::Schema;
use crate::value::Value;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

/// One compiled ordering key
#[derive(Debug, Clone)]
pub struct OrderKey {
    selector: ResolvedSelector,
    direction: SortDirection,
}

/// Composite multi-key comparator
#[derive(Debug, Clone)]
pub struct Comparator {
    keys: Vec<OrderKey>,
}

impl Comparator {
    pub fn keys(&self) -> usize {
        self.keys.len()
    }

    /// Read every key of an element, in key order
    pub fn extract(&self, element: &dyn Any) -> Vec<Value> {
        self.keys.iter().map(|k| k.selector.read(element)).collect()
    }

    /// Compare two key tuples produced by [`Comparator::extract`]
    pub fn compare_keys(&self, a: &[Value], b: &[Value]) -> Ordering {
        for ((key, a), b) in self.keys.iter().zip(a).zip(b) {
            let ordering = a.sort_cmp(b);
            let ordering = match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Compare two elements directly
    pub fn compare(&self, a: &dyn Any, b: &dyn Any) -> Ordering {
        self.compare_keys(&self.extract(a), &self.extract(b))
    }

    /// Stable sort of `elements`. Keys are read once per element.
    pub fn sort<'a>(&self, elements: Vec<&'a dyn Any>) -> Vec<&'a dyn Any> {
        let mut decorated: Vec<(Vec<Value>, &'a dyn Any)> = elements
            .into_iter()
            .map(|e| (self.extract(e), e))
            .collect();
        decorated.sort_by(|(a, _), (b, _)| self.compare_keys(a, b));
        decorated.into_iter().map(|(_, e)| e).collect()
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", key.selector.path(), key.direction)?;
        }
        Ok(())
    }
}

/// Compile `keys` against `schema`
pub fn compile(schema: &Schema, keys: &[SortKey]) -> Result<Comparator> {
    let keys = keys
        .iter()
        .map(|key| {
            Ok(OrderKey {
                selector: resolve(schema, &key.selector)?,
                direction: key.direction,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Comparator { keys })
}
