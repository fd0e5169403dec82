/// Projection compilation
///
/// Compiles the `select` list into column metadata and a row builder.
use super::request::SelectItem;
use super::result::{Column, Row};
use super::selector::{resolve, ResolvedSelector};
use crate::error::{Error, Result};
use crate::schema::Schema;
use std::any::Any;
use std::fmt;

/// Compiled `select` list
#[derive(Debug, Clone)]
pub struct Projection {
    columns: Vec<Column>,
    selectors: Vec<ResolvedSelector>,
}

impl Projection {
    /// Output columns, identical for every execution of the same request
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Build one output row from an element
    pub fn project(&self, element: &dyn Any) -> Row {
        Row {
            values: self.selectors.iter().map(|s| s.read(element)).collect(),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if column.name == column.selector {
                write!(f, "{}", column.selector)?;
            } else {
                write!(f, "{} AS {}", column.selector, column.name)?;
            }
        }
        Ok(())
    }
}

/// Compile `items` against `schema`
pub fn compile(schema: &Schema, items: &[SelectItem]) -> Result<Projection> {
    if items.is_empty() {
        return Err(Error::Validation("Select cannot be empty".to_string()));
    }

    let mut columns = Vec::with_capacity(items.len());
    let mut selectors = Vec::with_capacity(items.len());
    for item in items {
        selectors.push(resolve(schema, &item.selector)?);
        columns.push(Column {
            name: item.output_name().to_string(),
            selector: item.selector.clone(),
        });
    }

    Ok(Projection { columns, selectors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::SchemaBuilder;
    use crate::value::Value;

    struct Point {
        x: i32,
        y: i32,
    }

    fn schema() -> Schema {
        SchemaBuilder::<Point>::new()
            .field("X", |p: &Point| p.x)
            .field("Y", |p: &Point| p.y)
            .build()
    }

    #[test]
    fn test_columns_follow_select_order() {
        let projection = compile(
            &schema(),
            &[SelectItem::new("Y"), SelectItem::aliased("X", "horizontal")],
        )
        .unwrap();

        let names: Vec<&str> = projection.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Y", "horizontal"]);

        let row = projection.project(&Point { x: 1, y: 2 });
        assert_eq!(row.values, vec![Value::Integer(2), Value::Integer(1)]);
        assert_eq!(projection.to_string(), "Y, X AS horizontal");
    }

    #[test]
    fn test_same_field_twice() {
        let projection =
            compile(&schema(), &[SelectItem::new("X"), SelectItem::new("X")]).unwrap();
        let row = projection.project(&Point { x: 5, y: 0 });
        assert_eq!(row.values, vec![Value::Integer(5), Value::Integer(5)]);
    }

    #[test]
    fn test_empty_select_rejected() {
        let err = compile(&schema(), &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let err = compile(&schema(), &[SelectItem::new("Z")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SelectorResolution);
    }
}
