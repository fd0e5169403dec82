/// Query Engine Demo
///
/// Demonstrates query-by-example requests over an in-memory collection
use jsonquery::{
    QueryProvider, QueryRequest, QueryResult, Queryable, Schema, SchemaBuilder, SortDirection,
};

struct City {
    name: String,
}

impl Queryable for City {
    fn schema() -> Schema {
        SchemaBuilder::<City>::new()
            .field("Name", |c: &City| c.name.clone())
            .build()
    }
}

struct User {
    id: i64,
    name: String,
    age: i32,
    city: Option<City>,
}

impl Queryable for User {
    fn schema() -> Schema {
        SchemaBuilder::<User>::new()
            .field("Id", |u: &User| u.id)
            .field("Name", |u: &User| u.name.clone())
            .field("Age", |u: &User| u.age)
            .nested_opt("City", |u: &User| u.city.as_ref(), City::schema())
            .build()
    }
}

fn user(id: i64, name: &str, age: i32, city: Option<&str>) -> User {
    User {
        id,
        name: name.to_string(),
        age,
        city: city.map(|c| City {
            name: c.to_string(),
        }),
    }
}

fn print_result(result: &QueryResult) {
    println!("   {}", result.column_names().join(" | "));
    for row in &result.rows {
        let cells: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
        println!("   {}", cells.join(" | "));
    }
    println!("   ({} rows)\n", result.len());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== JsonQuery Query Engine Demo ===\n");

    let mut provider = QueryProvider::new();
    provider.add_queryable(vec![
        user(1, "Alice", 30, Some("NYC")),
        user(2, "Bob", 25, Some("SF")),
        user(3, "Charlie", 35, Some("NYC")),
        user(4, "Diana", 28, None),
        user(5, "Eve", 42, Some("LA")),
    ])?;

    // Projection
    println!("1. SELECT Name, Age FROM User");
    let request = QueryRequest::from_source("User").select("Name").select("Age");
    print_result(&provider.execute_query(&request)?);

    // Filter on a nested field
    println!("2. Users living in NYC");
    let request = QueryRequest::from_source("User")
        .select("Name")
        .select_as("City.Name", "city")
        .filter("City.Name", "=", "'NYC'");
    print_result(&provider.execute_query(&request)?);

    // Multi-key ordering with pagination
    println!("3. Second page of users by age (2 per page)");
    let request = QueryRequest::from_source("User")
        .select("Name")
        .select("Age")
        .order_by("Age", SortDirection::Desc)
        .order_by("Name", SortDirection::Asc)
        .limit(2, 2);
    print_result(&provider.execute_query(&request)?);

    // IN set
    println!("4. Users with Id IN (1, 3, 5)");
    let request = QueryRequest::from_source("User")
        .select("Id")
        .select("Name")
        .filter_in("Id", ["'1'", "'3'", "'5'"]);
    print_result(&provider.execute_query(&request)?);

    // Requests as JSON
    println!("5. Request decoded from JSON");
    let request: QueryRequest = serde_json::from_str(
        r#"{
            "select": [{ "selector": "Name" }, { "selector": "Age", "alias": "years" }],
            "from": "User",
            "where": [{ "selector": "Age", "operator": "<", "value": "'30'" }],
            "orderBy": [{ "selector": "Age", "direction": "asc" }]
        }"#,
    )?;
    println!("   {}", request);
    println!("   plan: {}", provider.explain(&request)?);
    let result = provider.execute_query(&request)?;
    println!("   {}\n", serde_json::to_string(&result)?);

    // Errors are reported before any element is read
    println!("6. Error handling");
    let request = QueryRequest::from_source("User")
        .select("Name")
        .filter("Age", ">", "'old'");
    match provider.execute_query(&request) {
        Ok(_) => println!("   unexpected success"),
        Err(e) => println!("   {:?}: {}", e.kind(), e),
    }
    let request = QueryRequest::from_source("Orders").select("Id");
    if let Err(e) = provider.execute_query(&request) {
        println!("   {:?}: {}", e.kind(), e);
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
