/// Selector resolution
///
/// Turns a dotted path such as `Order.Customer.Name` into a chain of field
/// reads against a schema. Resolution happens once per request; the resulting
/// [`ResolvedSelector`] is then applied to every element.
use crate::error::{Error, Result};
use crate::schema::{FieldShape, NestedReader, NodeId, Schema, ValueReader};
use crate::value::{Value, ValueKind};
use std::any::Any;
use std::fmt;

/// A selector compiled against a schema
#[derive(Clone)]
pub struct ResolvedSelector {
    path: String,
    hops: Vec<NestedReader>,
    reader: ValueReader,
    kind: ValueKind,
}

impl ResolvedSelector {
    /// The selector as written in the request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Kind of the terminal field
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Number of nested records walked before the terminal field
    pub fn depth(&self) -> usize {
        self.hops.len()
    }

    /// Read the terminal value from an element. An absent nested record
    /// anywhere along the path reads as `Null`.
    pub fn read(&self, element: &dyn Any) -> Value {
        let mut current = element;
        for hop in &self.hops {
            match hop(current) {
                Some(next) => current = next,
                None => return Value::Null,
            }
        }
        (self.reader)(current)
    }
}

impl fmt::Debug for ResolvedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSelector")
            .field("path", &self.path)
            .field("depth", &self.hops.len())
            .field("kind", &self.kind)
            .finish()
    }
}

/// Resolve `path` against the element type of `schema`.
pub fn resolve(schema: &Schema, path: &str) -> Result<ResolvedSelector> {
    let mut hops = Vec::new();
    let (reader, kind) = resolve_from(schema, 0, path, path, &mut hops)?;
    Ok(ResolvedSelector {
        path: path.to_string(),
        hops,
        reader,
        kind,
    })
}

fn resolve_from(
    schema: &Schema,
    node: NodeId,
    full: &str,
    rest: &str,
    hops: &mut Vec<NestedReader>,
) -> Result<(ValueReader, ValueKind)> {
    let current = schema.node(node);
    let (head, tail) = match rest.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (rest, None),
    };

    if head.is_empty() {
        return Err(Error::selector(full, "empty path segment"));
    }

    let field = current.field(head).ok_or_else(|| {
        Error::selector(
            full,
            format!("no field '{}' on '{}'", head, current.type_name()),
        )
    })?;

    match (field.shape(), tail) {
        (FieldShape::Value { kind, reader }, None) => Ok((reader.clone(), *kind)),
        (FieldShape::Value { .. }, Some(_)) => Err(Error::selector(
            full,
            format!("'{}' is a value and has no fields", head),
        )),
        (FieldShape::Nested { node, reader }, Some(tail)) => {
            hops.push(reader.clone());
            resolve_from(schema, *node, full, tail, hops)
        }
        (FieldShape::Nested { node, .. }, None) => Err(Error::selector(
            full,
            format!(
                "'{}' is a nested '{}', select one of its fields",
                head,
                schema.node(*node).type_name()
            ),
        )),
    }
}
