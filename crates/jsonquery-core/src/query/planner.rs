/// Query planner
///
/// Validates a request, resolves its source and compiles every stage into a
/// [`QueryPlan`]. All request errors surface here, before any element is read.
use super::limit::Window;
use super::order::{self, Comparator};
use super::predicate::{self, Predicate};
use super::projection::{self, Projection};
use super::request::QueryRequest;
use crate::error::{Error, Result};
use crate::registry::{Collection, SourceRegistry};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Linear pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStage {
    ResolveSource,
    Filter,
    Sort,
    Paginate,
    Project,
    Materialize,
}

/// Compiled, ready-to-run query
#[derive(Clone)]
pub struct QueryPlan {
    pub(crate) source: String,
    pub(crate) collection: Arc<dyn Collection>,
    pub(crate) filter: Option<Predicate>,
    pub(crate) sort: Option<Comparator>,
    pub(crate) window: Option<Window>,
    pub(crate) projection: Projection,
}

impl QueryPlan {
    /// Name of the source the plan reads
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Stages this plan runs, optional ones only when present
    pub fn stages(&self) -> Vec<PlanStage> {
        let mut stages = vec![PlanStage::ResolveSource];
        if self.filter.is_some() {
            stages.push(PlanStage::Filter);
        }
        if self.sort.is_some() {
            stages.push(PlanStage::Sort);
        }
        if self.window.is_some() {
            stages.push(PlanStage::Paginate);
        }
        stages.push(PlanStage::Project);
        stages.push(PlanStage::Materialize);
        stages
    }
}

/// Query planner
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl Planner {
    /// Create a new planner
    pub fn new() -> Self {
        Self
    }

    /// Plan a request against the sources in `registry`
    pub fn plan(&self, request: &QueryRequest, registry: &SourceRegistry) -> Result<QueryPlan> {
        if request.select.is_empty() {
            return Err(Error::Validation("Select cannot be empty".to_string()));
        }
        if request.from.trim().is_empty() {
            return Err(Error::Validation("From is required".to_string()));
        }
        let window = request.limit.as_ref().map(Window::from_limit).transpose()?;

        let source = registry.get(&request.from)?;
        let schema = source.schema();

        let filter = if request.where_clauses.is_empty() {
            None
        } else {
            Some(predicate::compile(schema, &request.where_clauses)?)
        };

        let sort = if request.order_by.is_empty() {
            None
        } else {
            Some(order::compile(schema, &request.order_by)?)
        };

        let projection = projection::compile(schema, &request.select)?;

        let plan = QueryPlan {
            source: source.name().to_string(),
            collection: source.handle(),
            filter,
            sort,
            window,
            projection,
        };
        debug!(source = %plan.source, plan = %plan, "compiled query plan");
        Ok(plan)
    }
}

impl fmt::Display for PlanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStage::ResolveSource => write!(f, "ResolveSource"),
            PlanStage::Filter => write!(f, "Filter"),
            PlanStage::Sort => write!(f, "Sort"),
            PlanStage::Paginate => write!(f, "Paginate"),
            PlanStage::Project => write!(f, "Project"),
            PlanStage::Materialize => write!(f, "Materialize"),
        }
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Project({})", self.projection)?;
        if let Some(ref window) = self.window {
            write!(f, " -> Paginate({})", window)?;
        }
        if let Some(ref sort) = self.sort {
            write!(f, " -> Sort({})", sort)?;
        }
        if let Some(ref filter) = self.filter {
            write!(f, " -> Filter({})", filter)?;
        }
        write!(f, " -> Scan({})", self.source)
    }
}

impl fmt::Debug for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryPlan")
            .field("source", &self.source)
            .field("stages", &self.stages())
            .finish()
    }
}
