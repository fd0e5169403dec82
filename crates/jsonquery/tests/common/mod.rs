#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use jsonquery::{QueryProvider, QueryResult, Queryable, Schema, SchemaBuilder, Value};

/// Record with one field of each common kind
#[derive(Debug, Clone)]
pub struct Foo {
    pub int_property: i32,
    pub string_property: String,
    pub decimal_property: f64,
    pub date_time_property: NaiveDateTime,
}

impl Queryable for Foo {
    fn schema() -> Schema {
        SchemaBuilder::<Foo>::new()
            .field("IntProperty", |f: &Foo| f.int_property)
            .field("StringProperty", |f: &Foo| f.string_property.clone())
            .field("DecimalProperty", |f: &Foo| f.decimal_property)
            .field("DateTimeProperty", |f: &Foo| f.date_time_property)
            .build()
    }
}

pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// `IntProperty` runs 1..=n in source order. `DecimalProperty` repeats every
/// seven records so sorting on it produces ties.
pub fn foos(n: i32) -> Vec<Foo> {
    (1..=n)
        .map(|i| Foo {
            int_property: i,
            string_property: format!("String {:03}", i),
            decimal_property: f64::from(i % 7) * 0.25,
            date_time_property: epoch() + Duration::days(i64::from(i - 1)),
        })
        .collect()
}

pub fn provider() -> QueryProvider {
    let mut provider = QueryProvider::new();
    provider.add_queryable(foos(100)).unwrap();
    provider
}

/// Integer values of one column
pub fn ints(result: &QueryResult, column: &str) -> Vec<i64> {
    result
        .column_values(column)
        .unwrap()
        .into_iter()
        .map(|v| match v {
            Value::Integer(i) => *i,
            other => panic!("expected integer, got {:?}", other),
        })
        .collect()
}

/// Float values of one column
pub fn floats(result: &QueryResult, column: &str) -> Vec<f64> {
    result
        .column_values(column)
        .unwrap()
        .into_iter()
        .map(|v| match v {
            Value::Float(f) => *f,
            other => panic!("expected float, got {:?}", other),
        })
        .collect()
}
