//! # JsonQuery Core
//!
//! Core types for JsonQuery: the value model, element schemas, the source
//! registry, and the query engine that plans and runs query-by-example
//! requests over in-memory collections.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
#[allow(missing_docs)]
pub mod query;
#[allow(missing_docs)]
pub mod registry;
#[allow(missing_docs)]
pub mod schema;
#[deny(missing_docs)]
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use query::{
    Column, Executor, FilterClause, Limit, Planner, QueryPlan, QueryRequest, QueryResult, Row,
    SelectItem, SortDirection, SortKey,
};
pub use registry::{Collection, DuplicatePolicy, Source, SourceRegistry};
pub use schema::{Queryable, Schema, SchemaBuilder, SchemaProperty, SourceSchema};
pub use value::{FieldValue, Value, ValueKind};
