/// Query engine module
///
/// Query-by-example requests, their compilation into plans, and execution
/// over registered collections.
/// Query request shapes
#[allow(missing_docs)]
pub mod request;
/// Selector resolution
#[allow(missing_docs)]
pub mod selector;
/// Filter compilation
#[allow(missing_docs)]
pub mod predicate;
/// Sort compilation
#[allow(missing_docs)]
pub mod order;
/// Skip/take windows
#[allow(missing_docs)]
pub mod limit;
/// Projection compilation
#[allow(missing_docs)]
pub mod projection;
/// Query results
#[allow(missing_docs)]
pub mod result;
/// Query planner
#[allow(missing_docs)]
pub mod planner;
/// Query executor
#[allow(missing_docs)]
pub mod executor;

// Re-export main types
pub use executor::Executor;
pub use limit::Window;
pub use order::{Comparator, OrderKey};
pub use planner::{PlanStage, Planner, QueryPlan};
pub use predicate::{Condition, Operand, Operator, Predicate};
pub use projection::Projection;
pub use request::{FilterClause, Limit, QueryRequest, SelectItem, SortDirection, SortKey};
pub use result::{Column, QueryResult, Row};
pub use selector::{resolve, ResolvedSelector};
