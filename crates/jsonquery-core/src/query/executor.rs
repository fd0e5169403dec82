/// Query executor
///
/// Runs compiled plans: filter → sort → paginate → project → materialize.
use super::planner::{PlanStage, Planner, QueryPlan};
use super::request::QueryRequest;
use super::result::{QueryResult, Row};
use crate::error::Result;
use crate::registry::SourceRegistry;
use std::any::Any;
use tracing::{debug, trace};

/// Query executor
pub struct Executor<'r> {
    registry: &'r SourceRegistry,
}

impl<'r> Executor<'r> {
    /// Create new executor over the sources of `registry`
    pub fn new(registry: &'r SourceRegistry) -> Self {
        Self { registry }
    }

    /// Plan and run a request in one call
    pub fn execute_query(&self, request: &QueryRequest) -> Result<QueryResult> {
        let plan = Planner::new().plan(request, self.registry)?;
        self.execute(&plan)
    }

    /// Execute a compiled plan
    pub fn execute(&self, plan: &QueryPlan) -> Result<QueryResult> {
        let collection = plan.collection.as_ref();
        trace!(source = %plan.source, elements = collection.element_count(), stage = %PlanStage::ResolveSource);

        let elements = collection.elements();
        let filtered: Box<dyn Iterator<Item = &dyn Any> + '_> = match &plan.filter {
            Some(predicate) => {
                trace!(stage = %PlanStage::Filter, clauses = predicate.conditions().len());
                Box::new(elements.filter(move |e| predicate.matches(*e)))
            }
            None => elements,
        };

        // Sorting needs the whole filtered sequence; otherwise stay lazy
        let ordered: Box<dyn Iterator<Item = &dyn Any> + '_> = match &plan.sort {
            Some(comparator) => {
                let candidates: Vec<&dyn Any> = filtered.collect();
                trace!(stage = %PlanStage::Sort, keys = comparator.keys(), candidates = candidates.len());
                Box::new(comparator.sort(candidates).into_iter())
            }
            None => filtered,
        };

        let windowed: Box<dyn Iterator<Item = &dyn Any> + '_> = match &plan.window {
            Some(window) => {
                trace!(stage = %PlanStage::Paginate, skip = window.skip(), take = ?window.take());
                Box::new(window.apply(ordered))
            }
            None => ordered,
        };

        let projection = &plan.projection;
        let rows: Vec<Row> = windowed.map(|e| projection.project(e)).collect();

        debug!(
            source = %plan.source,
            rows = rows.len(),
            columns = projection.columns().len(),
            "query executed"
        );

        Ok(QueryResult {
            columns: projection.columns().to_vec(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::request::SortDirection;
    use crate::schema::SchemaBuilder;
    use crate::value::Value;
    use std::sync::Arc;

    struct Product {
        name: String,
        price: i64,
        stock: Option<i32>,
    }

    fn registry() -> SourceRegistry {
        let schema = SchemaBuilder::<Product>::new()
            .field("Name", |p: &Product| p.name.clone())
            .field("Price", |p: &Product| p.price)
            .field("Stock", |p: &Product| p.stock)
            .build();
        let products = vec![
            Product {
                name: "Laptop".into(),
                price: 1000,
                stock: Some(3),
            },
            Product {
                name: "Mouse".into(),
                price: 25,
                stock: None,
            },
            Product {
                name: "Keyboard".into(),
                price: 75,
                stock: Some(0),
            },
        ];
        let mut registry = SourceRegistry::new();
        registry
            .register("products", schema, Arc::new(products))
            .unwrap();
        registry
    }

    fn names(result: &QueryResult) -> Vec<String> {
        result
            .rows
            .iter()
            .map(|r| r.values[0].to_string())
            .collect()
    }

    #[test]
    fn test_table_scan() {
        let registry = registry();
        let result = Executor::new(&registry)
            .execute_query(&QueryRequest::from_source("products").select("Name"))
            .unwrap();
        assert_eq!(names(&result), vec!["Laptop", "Mouse", "Keyboard"]);
        assert_eq!(result.column_names(), vec!["Name"]);
    }

    #[test]
    fn test_filter_sort_limit() {
        let registry = registry();
        let request = QueryRequest::from_source("products")
            .select("Name")
            .select("Price")
            .filter("Price", ">", "'50'")
            .order_by("Price", SortDirection::Asc)
            .limit(0, 1);
        let result = Executor::new(&registry).execute_query(&request).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.rows[0].values,
            vec![Value::String("Keyboard".into()), Value::Integer(75)]
        );
    }

    #[test]
    fn test_null_values_projected_and_sorted_first() {
        let registry = registry();
        let request = QueryRequest::from_source("products")
            .select("Name")
            .select("Stock")
            .order_by("Stock", SortDirection::Asc);
        let result = Executor::new(&registry).execute_query(&request).unwrap();

        assert_eq!(names(&result), vec!["Mouse", "Keyboard", "Laptop"]);
        assert_eq!(result.rows[0].values[1], Value::Null);
    }

    #[test]
    fn test_paginate_without_sort_keeps_source_order() {
        let registry = registry();
        let request = QueryRequest::from_source("products")
            .select("Name")
            .limit(1, 0);
        let result = Executor::new(&registry).execute_query(&request).unwrap();
        assert_eq!(names(&result), vec!["Mouse", "Keyboard"]);
    }

    #[test]
    fn test_plan_reusable() {
        let registry = registry();
        let request = QueryRequest::from_source("products")
            .select("Name")
            .filter("Stock", ">=", "'0'");
        let plan = Planner::new().plan(&request, &registry).unwrap();
        let executor = Executor::new(&registry);

        let first = executor.execute(&plan).unwrap();
        let second = executor.execute(&plan).unwrap();
        assert_eq!(first, second);
        assert_eq!(names(&first), vec!["Laptop", "Keyboard"]);
    }
}
