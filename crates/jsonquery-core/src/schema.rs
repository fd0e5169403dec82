//! Element type descriptors.
//!
//! The engine never inspects record types on its own: a [`Schema`] supplied at
//! registration lists, for every field name, how to read it and what
//! [`ValueKind`] it has. Nested record types live in the same schema as an
//! arena of [`SchemaNode`]s addressed by [`NodeId`], so self-referential types
//! only need an index back to an earlier node.

use crate::value::{FieldValue, Value, ValueKind};
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Index of a node in a schema arena. Node 0 is the element type.
pub type NodeId = usize;

/// Reads a terminal value out of a type-erased record
pub type ValueReader = Arc<dyn Fn(&dyn Any) -> Value + Send + Sync>;

/// Steps from a type-erased record into a nested one, `None` when absent
pub type NestedReader = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;

/// Record types that carry their own descriptor.
///
/// ```rust
/// use jsonquery_core::{Queryable, Schema, SchemaBuilder};
///
/// struct Foo {
///     id: i32,
///     label: String,
/// }
///
/// impl Queryable for Foo {
///     fn schema() -> Schema {
///         SchemaBuilder::<Foo>::new()
///             .field("Id", |f: &Foo| f.id)
///             .field("Label", |f: &Foo| f.label.clone())
///             .build()
///     }
/// }
///
/// assert_eq!(Foo::schema().name(), "Foo");
/// ```
pub trait Queryable: Any + Send + Sync {
    /// Descriptor for this record type
    fn schema() -> Schema;
}

/// How a field is read
#[derive(Clone)]
pub enum FieldShape {
    /// Terminal field with a primitive value
    Value { kind: ValueKind, reader: ValueReader },
    /// Field holding another record described by `node`
    Nested { node: NodeId, reader: NestedReader },
}

/// One entry of a node's field table
#[derive(Clone)]
pub struct FieldDef {
    name: String,
    shape: FieldShape,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &FieldShape {
        &self.shape
    }

    /// Value kind for terminal fields
    pub fn kind(&self) -> Option<ValueKind> {
        match &self.shape {
            FieldShape::Value { kind, .. } => Some(*kind),
            FieldShape::Nested { .. } => None,
        }
    }
}

/// Field table of one record type
#[derive(Clone)]
pub struct SchemaNode {
    type_name: String,
    fields: Vec<FieldDef>,
}

impl SchemaNode {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by name.
    ///
    /// An exact match wins; otherwise the first ASCII case-insensitive match
    /// is used.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }
}

/// Descriptor of a registered element type
#[derive(Clone)]
pub struct Schema {
    name: String,
    nodes: Vec<SchemaNode>,
}

impl Schema {
    /// Default source name for this element type
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptor of the element type itself
    pub fn root(&self) -> &SchemaNode {
        &self.nodes[0]
    }

    /// Node by id. Ids come from [`FieldShape::Nested`] of the same schema.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Read-only description of the field tree.
    pub fn describe(&self) -> SourceSchema {
        let mut path = vec![0];
        SourceSchema {
            name: self.name.clone(),
            properties: self.describe_node(0, &mut path),
        }
    }

    fn describe_node(&self, id: NodeId, path: &mut Vec<NodeId>) -> Vec<SchemaProperty> {
        self.nodes[id]
            .fields
            .iter()
            .map(|field| match &field.shape {
                FieldShape::Value { kind, .. } => SchemaProperty {
                    name: field.name.clone(),
                    kind: Some(*kind),
                    type_name: None,
                    properties: Vec::new(),
                },
                FieldShape::Nested { node, .. } => {
                    // Back-edges are reported by type name only
                    let properties = if path.contains(node) {
                        Vec::new()
                    } else {
                        path.push(*node);
                        let props = self.describe_node(*node, path);
                        path.pop();
                        props
                    };
                    SchemaProperty {
                        name: field.name.clone(),
                        kind: None,
                        type_name: Some(self.nodes[*node].type_name.clone()),
                        properties,
                    }
                }
            })
            .collect()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// Serializable description of a source's element type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSchema {
    pub name: String,
    pub properties: Vec<SchemaProperty>,
}

/// One field in a [`SourceSchema`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaProperty {
    pub name: String,
    /// Set for terminal fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    /// Set for nested fields
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<SchemaProperty>,
}

/// Builds a [`Schema`] for record type `T` from typed accessors.
pub struct SchemaBuilder<T> {
    name: String,
    nodes: Vec<SchemaNode>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Any> SchemaBuilder<T> {
    /// Start a schema named after `T`'s short type name.
    pub fn new() -> Self {
        let type_name = short_type_name::<T>();
        Self {
            name: type_name.clone(),
            nodes: vec![SchemaNode {
                type_name,
                fields: Vec::new(),
            }],
            _marker: PhantomData,
        }
    }

    /// Override the default source name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a terminal field.
    pub fn field<V, F>(self, name: impl Into<String>, read: F) -> Self
    where
        V: FieldValue,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let reader: ValueReader = Arc::new(move |record: &dyn Any| {
            record
                .downcast_ref::<T>()
                .map(|r| read(r).into_value())
                .unwrap_or(Value::Null)
        });
        self.push(
            name,
            FieldShape::Value {
                kind: V::KIND,
                reader,
            },
        )
    }

    /// Add a nested record that is always present.
    pub fn nested<U, F>(self, name: impl Into<String>, read: F, schema: Schema) -> Self
    where
        U: Any,
        F: for<'a> Fn(&'a T) -> &'a U + Send + Sync + 'static,
    {
        self.nested_opt(name, move |r: &T| Some(read(r)), schema)
    }

    /// Add an optional nested record. Absent records read as `Null`.
    pub fn nested_opt<U, F>(mut self, name: impl Into<String>, read: F, schema: Schema) -> Self
    where
        U: Any,
        F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
    {
        let node = self.merge(schema);
        self.push(
            name,
            FieldShape::Nested {
                node,
                reader: erase_nested(read),
            },
        )
    }

    /// Add an optional nested record of the same type as `T`.
    pub fn recursive<F>(self, name: impl Into<String>, read: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Option<&'a T> + Send + Sync + 'static,
    {
        self.push(
            name,
            FieldShape::Nested {
                node: 0,
                reader: erase_nested(read),
            },
        )
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            nodes: self.nodes,
        }
    }

    fn push(mut self, name: impl Into<String>, shape: FieldShape) -> Self {
        self.nodes[0].fields.push(FieldDef {
            name: name.into(),
            shape,
        });
        self
    }

    /// Append another schema's arena, re-basing its node ids.
    fn merge(&mut self, schema: Schema) -> NodeId {
        let offset = self.nodes.len();
        self.nodes.extend(schema.nodes.into_iter().map(|mut node| {
            for field in &mut node.fields {
                if let FieldShape::Nested { node, .. } = &mut field.shape {
                    *node += offset;
                }
            }
            node
        }));
        offset
    }
}

impl<T: Any> Default for SchemaBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn erase_nested<T, U, F>(read: F) -> NestedReader
where
    T: Any,
    U: Any,
    F: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
{
    fn hint<F>(f: F) -> F
    where
        F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any>,
    {
        f
    }

    Arc::new(hint(move |record: &dyn Any| {
        record
            .downcast_ref::<T>()
            .and_then(|r| read(r))
            .map(|u| u as &dyn Any)
    }))
}

/// `my_crate::model::Foo<Bar>` becomes `Foo`
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
