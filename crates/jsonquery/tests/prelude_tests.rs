use jsonquery::*;
use std::sync::Arc;

struct Sample {
    id: i64,
}

#[test]
fn test_glob_import_keeps_std_iteration() {
    let values: Vec<i32> = vec![1, 2, 3];
    assert_eq!(values.iter().next(), Some(&1));
    assert_eq!(values.iter().copied().sum::<i32>(), 6);

    let shared: Arc<Vec<i32>> = Arc::new(values);
    assert_eq!(shared.iter().max(), Some(&3));
    assert_eq!(shared.len(), 3);
}

#[test]
fn test_glob_import_collection_access() {
    let samples = vec![Sample { id: 7 }, Sample { id: 9 }];
    assert_eq!(samples.element_count(), 2);

    let ids: Vec<i64> = samples
        .elements()
        .filter_map(|e| e.downcast_ref::<Sample>())
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![7, 9]);

    let schema = SchemaBuilder::<Sample>::new()
        .field("Id", |s: &Sample| s.id)
        .build();
    let mut provider = QueryProvider::new();
    provider.add_source("samples", schema, samples).unwrap();
    let described = provider.schema("samples").unwrap();
    let names: Vec<&str> = described.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Id"]);
}
