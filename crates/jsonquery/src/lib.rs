//! # JsonQuery
//!
//! Query in-memory Rust collections with a structured, serializable query
//! description: pick columns, filter with typed comparisons, sort by several
//! keys, page with skip/take, and get back a uniform table of values.
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonquery::{QueryProvider, QueryRequest, Queryable, Schema, SchemaBuilder, SortDirection};
//!
//! struct Foo {
//!     id: i32,
//!     label: String,
//! }
//!
//! impl Queryable for Foo {
//!     fn schema() -> Schema {
//!         SchemaBuilder::<Foo>::new()
//!             .field("IntProperty", |f: &Foo| f.id)
//!             .field("StringProperty", |f: &Foo| f.label.clone())
//!             .build()
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut provider = QueryProvider::new();
//!     provider.add_queryable((1..=100).map(|i| Foo { id: i, label: format!("item {}", i) }).collect())?;
//!
//!     let request = QueryRequest::from_source("Foo")
//!         .select("IntProperty")
//!         .select("StringProperty")
//!         .filter("IntProperty", ">", "'90'")
//!         .order_by("IntProperty", SortDirection::Desc)
//!         .limit(0, 3);
//!
//!     let result = provider.execute_query(&request)?;
//!     assert_eq!(result.column_names(), vec!["IntProperty", "StringProperty"]);
//!     assert_eq!(result.len(), 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Requests as JSON
//!
//! [`QueryRequest`] deserializes from the JSON shape used on the wire:
//!
//! ```json
//! {
//!   "select": [{ "selector": "IntProperty" }],
//!   "from": "Foo",
//!   "where": [{ "selector": "IntProperty", "operator": "IN", "valueSet": ["1", "2"] }],
//!   "orderBy": [{ "selector": "IntProperty", "direction": "desc" }],
//!   "limit": { "skip": 0, "take": 10 }
//! }
//! ```
//!
//! A filter `value` wrapped in single quotes is a literal; anything else is
//! another selector on the same element.

#![warn(missing_docs)]

use std::sync::Arc;
use tracing::debug;

pub mod logging;
pub mod security;

pub use security::ResourceLimits;

// Re-export core types
pub use jsonquery_core::query::{
    Column, Executor, FilterClause, Limit, PlanStage, Planner, QueryPlan, QueryRequest,
    QueryResult, Row, SelectItem, SortDirection, SortKey,
};
pub use jsonquery_core::{
    Collection, DuplicatePolicy, Error, ErrorKind, FieldValue, Queryable, Result, Schema,
    SchemaBuilder, SchemaProperty, SourceRegistry, SourceSchema, Value, ValueKind,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Provider configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderConfig {
    /// What happens when a source name is registered twice
    pub duplicate_policy: DuplicatePolicy,
    /// Bounds applied to every request before planning
    pub limits: ResourceLimits,
}

impl ProviderConfig {
    /// Set the duplicate registration policy
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Set the request limits
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Registry of queryable collections plus the entry point for running
/// requests against them.
///
/// Registration takes `&mut self`; querying takes `&self`. Once all sources
/// are registered the provider can be wrapped in an [`Arc`] and queried from
/// many threads at once.
///
/// # Examples
///
/// ```rust
/// use jsonquery::{QueryProvider, QueryRequest, SchemaBuilder};
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// let schema = SchemaBuilder::<Point>::new()
///     .field("X", |p: &Point| p.x)
///     .field("Y", |p: &Point| p.y)
///     .build();
///
/// let mut provider = QueryProvider::new();
/// provider.add_source("points", schema, vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }])?;
///
/// let result = provider.execute_query(
///     &QueryRequest::from_source("points").select("Y").filter("X", "=", "'3'"),
/// )?;
/// assert_eq!(result.rows[0].values, vec![jsonquery::Value::Integer(4)]);
/// # Ok::<(), jsonquery::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct QueryProvider {
    registry: SourceRegistry,
    config: ProviderConfig,
}

impl QueryProvider {
    /// Creates a provider with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any limit is zero.
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        config.limits.validate()?;
        Ok(Self {
            registry: SourceRegistry::with_policy(config.duplicate_policy),
            config,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Registers a collection under its element type's schema name.
    pub fn add_queryable<T: Queryable>(&mut self, items: Vec<T>) -> Result<()> {
        let schema = T::schema();
        let name = schema.name().to_string();
        self.registry.register(name, schema, Arc::new(items))
    }

    /// Registers a collection under an explicit name.
    pub fn add_queryable_named<T: Queryable>(
        &mut self,
        items: Vec<T>,
        name: impl Into<String>,
    ) -> Result<()> {
        self.registry.register(name, T::schema(), Arc::new(items))
    }

    /// Registers any collection with an explicit schema.
    ///
    /// Use this for element types that do not implement [`Queryable`], or to
    /// share an `Arc<Vec<T>>` the caller keeps a handle to.
    pub fn add_source<C: Collection + 'static>(
        &mut self,
        name: impl Into<String>,
        schema: Schema,
        collection: C,
    ) -> Result<()> {
        self.registry.register(name, schema, Arc::new(collection))
    }

    /// Unregisters a source, returning whether it existed.
    pub fn remove_source(&mut self, name: &str) -> bool {
        self.registry.remove(name)
    }

    /// Validates and compiles a request without running it.
    ///
    /// Every request error (validation, unknown source, unresolvable
    /// selector, unknown operator, bad literal) is reported here.
    pub fn prepare(&self, request: &QueryRequest) -> Result<QueryPlan> {
        security::validate_request(request, &self.config.limits)?;
        Planner::new().plan(request, &self.registry)
    }

    /// Runs a plan produced by [`prepare`](Self::prepare).
    ///
    /// A plan keeps the collection it was compiled against, so it may be run
    /// any number of times.
    pub fn execute_plan(&self, plan: &QueryPlan) -> Result<QueryResult> {
        Executor::new(&self.registry).execute(plan)
    }

    /// Validates, plans and runs a request.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use jsonquery::{QueryProvider, QueryRequest};
    /// # let provider = QueryProvider::new();
    /// let request = QueryRequest::from_source("Foo").select("IntProperty").limit(10, 20);
    /// let result = provider.execute_query(&request)?;
    /// for row in &result.rows {
    ///     println!("{:?}", row.values);
    /// }
    /// # Ok::<(), jsonquery::Error>(())
    /// ```
    pub fn execute_query(&self, request: &QueryRequest) -> Result<QueryResult> {
        let plan = self.prepare(request)?;
        let result = self.execute_plan(&plan)?;
        debug!(request = %request, rows = result.len(), "request served");
        Ok(result)
    }

    /// Describes the plan a request compiles to.
    pub fn explain(&self, request: &QueryRequest) -> Result<String> {
        Ok(self.prepare(request)?.to_string())
    }

    /// Field tree of a registered source.
    pub fn schema(&self, name: &str) -> Result<SourceSchema> {
        Ok(self.registry.get(name)?.schema().describe())
    }

    /// Registered source names, sorted.
    pub fn sources(&self) -> Vec<String> {
        self.registry.names()
    }
}
