/// Query results
///
/// Uniform tabular output: column names plus rows of values aligned with
/// them. Results are encoded for callers, never decoded back.
use crate::value::Value;
use serde::Serialize;

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Output name: the alias if one was given, else the selector
    pub name: String,
    /// Selector the column reads
    pub selector: String,
}

/// Query result row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fully materialized result of one request
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryResult {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of the column with output name `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(index)).collect())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> QueryResult {
        QueryResult {
            columns: vec![
                Column {
                    name: "id".into(),
                    selector: "Id".into(),
                },
                Column {
                    name: "Name".into(),
                    selector: "Name".into(),
                },
            ],
            rows: vec![
                Row {
                    values: vec![Value::Integer(1), Value::String("Alice".into())],
                },
                Row {
                    values: vec![Value::Integer(2), Value::Null],
                },
            ],
        }
    }

    #[test]
    fn test_column_lookup() {
        let result = result();
        assert_eq!(result.column_names(), vec!["id", "Name"]);
        assert_eq!(result.column_index("Name"), Some(1));
        assert_eq!(result.column_index("Id"), None);
        assert_eq!(
            result.column_values("id").unwrap(),
            vec![&Value::Integer(1), &Value::Integer(2)]
        );
    }

    #[test]
    fn test_serializes_rows_as_arrays() {
        let json = serde_json::to_value(result()).unwrap();
        assert_eq!(json["rows"][0], serde_json::json!([1, "Alice"]));
        assert_eq!(json["rows"][1][1], serde_json::Value::Null);
        assert_eq!(json["columns"][0]["name"], "id");
    }

    #[test]
    fn test_timestamp_like_string_stays_a_string() {
        let result = QueryResult {
            columns: vec![Column {
                name: "Note".into(),
                selector: "Note".into(),
            }],
            rows: vec![Row {
                values: vec![Value::String("2024-01-01T00:00:00".into())],
            }],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["rows"][0][0], serde_json::json!("2024-01-01T00:00:00"));
        assert_eq!(result.rows[0].values[0].kind(), Some(crate::value::ValueKind::String));
    }
}
