mod common;

use common::{foos, ints, provider, Foo};
use jsonquery::{Queryable, QueryProvider, QueryRequest, SortDirection};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_queries_share_provider() {
    let provider = Arc::new(provider());
    let expected = provider
        .execute_query(
            &QueryRequest::from_source("Foo")
                .select("IntProperty")
                .order_by("DecimalProperty", SortDirection::Desc)
                .limit(0, 10),
        )
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let provider = Arc::clone(&provider);
            thread::spawn(move || {
                let threshold = format!("'{}'", t * 10);
                let filtered = provider
                    .execute_query(
                        &QueryRequest::from_source("Foo")
                            .select("IntProperty")
                            .filter("IntProperty", ">", threshold.as_str()),
                    )
                    .unwrap();
                assert_eq!(filtered.len(), 100 - t * 10);

                provider
                    .execute_query(
                        &QueryRequest::from_source("Foo")
                            .select("IntProperty")
                            .order_by("DecimalProperty", SortDirection::Desc)
                            .limit(0, 10),
                    )
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_plan_shared_across_threads() {
    let provider = Arc::new(provider());
    let plan = Arc::new(
        provider
            .prepare(
                &QueryRequest::from_source("Foo")
                    .select("IntProperty")
                    .filter("IntProperty", "<=", "'5'"),
            )
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let provider = Arc::clone(&provider);
            let plan = Arc::clone(&plan);
            thread::spawn(move || ints(&provider.execute_plan(&plan).unwrap(), "IntProperty"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![1, 2, 3, 4, 5]);
    }
}

#[test]
fn test_shared_collection_handle() {
    let items = Arc::new(foos(10));
    let mut provider = QueryProvider::new();
    provider
        .add_source("first", Foo::schema(), Arc::clone(&items))
        .unwrap();
    provider
        .add_source("second", Foo::schema(), Arc::clone(&items))
        .unwrap();

    let count = |name: &str| {
        provider
            .execute_query(&QueryRequest::from_source(name).select("IntProperty"))
            .unwrap()
            .len()
    };
    assert_eq!(count("first"), 10);
    assert_eq!(count("second"), 10);
    assert_eq!(provider.sources(), vec!["first", "second"]);
}
