use jsonquery::logging::{LogConfig, LogFormat};
use jsonquery::{ErrorKind, QueryProvider, QueryRequest, SchemaBuilder};
use std::fs;
use tempfile::tempdir;

struct Event {
    id: i64,
}

#[test]
fn test_file_logging_captures_query_events() {
    std::env::remove_var("RUST_LOG");
    let dir = tempdir().unwrap();

    let guard = LogConfig::default()
        .with_level("jsonquery_core=debug")
        .with_file(dir.path().join("jsonquery-test.log"))
        .with_format(LogFormat::Compact)
        .init()
        .unwrap();
    assert!(guard.is_some());

    // A second global subscriber is refused instead of panicking
    assert_eq!(
        LogConfig::info().init().unwrap_err().kind(),
        ErrorKind::Validation
    );

    let schema = SchemaBuilder::<Event>::new()
        .field("Id", |e: &Event| e.id)
        .build();
    let mut provider = QueryProvider::new();
    provider
        .add_source("events", schema, vec![Event { id: 1 }, Event { id: 2 }])
        .unwrap();
    provider
        .execute_query(&QueryRequest::from_source("events").select("Id"))
        .unwrap();

    drop(guard);

    let contents: String = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect();
    assert!(contents.contains("registered queryable"));
    assert!(contents.contains("query executed"));
}
