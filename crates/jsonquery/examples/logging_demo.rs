use jsonquery::logging::LogConfig;
use jsonquery::{QueryProvider, QueryRequest, SchemaBuilder, SortDirection};

struct Task {
    id: i64,
    title: String,
    done: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (debug level with pretty output to stdout)
    let _guard = LogConfig::debug().init()?;

    println!("=== JsonQuery Logging Demo ===\n");

    let schema = SchemaBuilder::<Task>::new()
        .named("tasks")
        .field("Id", |t: &Task| t.id)
        .field("Title", |t: &Task| t.title.clone())
        .field("Done", |t: &Task| t.done)
        .build();

    // Registration is logged at debug level
    println!("1. Registering tasks...");
    let mut provider = QueryProvider::new();
    provider.add_source(
        "tasks",
        schema,
        vec![
            Task {
                id: 1,
                title: "Write docs".into(),
                done: true,
            },
            Task {
                id: 2,
                title: "Fix parser".into(),
                done: false,
            },
            Task {
                id: 3,
                title: "Release".into(),
                done: false,
            },
        ],
    )?;

    // Planning and execution each emit a debug event
    println!("\n2. Running a query...");
    let result = provider.execute_query(
        &QueryRequest::from_source("tasks")
            .select("Title")
            .filter("Done", "=", "'false'")
            .order_by("Id", SortDirection::Desc),
    )?;
    println!("Open tasks: {}", result.len());

    // Failures are returned, not logged as errors
    println!("\n3. Querying an unknown source...");
    if let Err(e) = provider.execute_query(&QueryRequest::from_source("jobs").select("Id")) {
        println!("Error: {}", e);
    }

    println!("\n=== Demo Complete ===");
    println!("Set RUST_LOG=jsonquery_core=trace to see every pipeline stage.");

    Ok(())
}
