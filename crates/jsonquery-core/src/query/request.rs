/// Query request shapes
///
/// A request is a plain data description of projection, filtering, ordering
/// and pagination. It is what callers build (or deserialize) and hand to the
/// planner once.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A complete query request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    pub select: Vec<SelectItem>,
    #[serde(deserialize_with = "deserialize_from")]
    pub from: String,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub where_clauses: Vec<FilterClause>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<SortKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
}

/// One output column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    pub selector: String,
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// One filter condition. All clauses of a request AND-combine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub selector: String,
    pub operator: String,
    /// `'literal'` or, unquoted, another selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Literals for `IN`
    #[serde(
        rename = "valueSet",
        alias = "values",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub value_set: Option<Vec<String>>,
}

/// One ordering key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub selector: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Skip-then-take window. `0` disables either part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Limit {
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub take: i64,
}

impl QueryRequest {
    /// Start a request against `source`
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            from: source.into(),
            ..Default::default()
        }
    }

    /// Add an output column named after its selector
    pub fn select(mut self, selector: impl Into<String>) -> Self {
        self.select.push(SelectItem::new(selector));
        self
    }

    /// Add an output column with an alias
    pub fn select_as(mut self, selector: impl Into<String>, alias: impl Into<String>) -> Self {
        self.select.push(SelectItem::aliased(selector, alias));
        self
    }

    /// Add a scalar filter clause. Quote `value` to make it a literal.
    pub fn filter(
        mut self,
        selector: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.where_clauses
            .push(FilterClause::value(selector, operator, value));
        self
    }

    /// Add an `IN` clause
    pub fn filter_in<I, S>(mut self, selector: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.where_clauses.push(FilterClause::value_set(selector, values));
        self
    }

    pub fn order_by(mut self, selector: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(SortKey {
            selector: selector.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, skip: i64, take: i64) -> Self {
        self.limit = Some(Limit { skip, take });
        self
    }
}

impl SelectItem {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            alias: None,
        }
    }

    pub fn aliased(selector: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            alias: Some(alias.into()),
        }
    }

    /// Output column name: the alias if given, else the raw selector
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.selector)
    }
}

impl FilterClause {
    pub fn value(
        selector: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            selector: selector.into(),
            operator: operator.into(),
            value: Some(value.into()),
            value_set: None,
        }
    }

    pub fn value_set<I, S>(selector: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selector: selector.into(),
            operator: "IN".to_string(),
            value: None,
            value_set: Some(values.into_iter().map(Into::into).collect()),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// `from` is either the bare source name or `{ "name": ... }`
fn deserialize_from<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FromRepr {
        Name(String),
        Object {
            #[serde(alias = "Name")]
            name: String,
        },
    }

    Ok(match FromRepr::deserialize(deserializer)? {
        FromRepr::Name(name) | FromRepr::Object { name } => name,
    })
}

// Display implementations for logging and error messages

impl fmt::Display for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, " FROM {}", self.from)?;
        for (i, clause) in self.where_clauses.iter().enumerate() {
            let keyword = if i == 0 { "WHERE" } else { "AND" };
            write!(f, " {} {}", keyword, clause)?;
        }
        for (i, key) in self.order_by.iter().enumerate() {
            let keyword = if i == 0 { " ORDER BY " } else { ", " };
            write!(f, "{}{}", keyword, key)?;
        }
        if let Some(ref limit) = self.limit {
            write!(f, " {}", limit)?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector)?;
        if let Some(ref alias) = self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.selector, self.operator)?;
        if let Some(ref value) = self.value {
            write!(f, " {}", value)?;
        }
        if let Some(ref values) = self.value_set {
            write!(f, " (")?;
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.selector, self.direction)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SKIP {} TAKE {}", self.skip, self.take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name_prefers_alias() {
        assert_eq!(SelectItem::new("a.b").output_name(), "a.b");
        assert_eq!(SelectItem::aliased("a.b", "b").output_name(), "b");
    }

    #[test]
    fn test_builder_display() {
        let request = QueryRequest::from_source("Foo")
            .select("IntProperty")
            .select_as("StringProperty", "label")
            .filter("IntProperty", "<=", "'20'")
            .filter_in("IntProperty", ["'10'", "'20'"])
            .order_by("IntProperty", SortDirection::Desc)
            .limit(10, 20);

        assert_eq!(
            request.to_string(),
            "SELECT IntProperty, StringProperty AS label FROM Foo \
             WHERE IntProperty <= '20' AND IntProperty IN ('10', '20') \
             ORDER BY IntProperty DESC SKIP 10 TAKE 20"
        );
    }

    #[test]
    fn test_deserialize_json_request() {
        let json = r#"{
            "select": [{"selector": "IntProperty"}, {"selector": "Child.Name", "name": "child"}],
            "from": {"name": "Foo"},
            "where": [
                {"selector": "IntProperty", "operator": "in", "values": ["10", "20"]},
                {"selector": "StringProperty", "operator": "!=", "value": "'x'"}
            ],
            "orderBy": [{"selector": "IntProperty", "direction": "desc"}],
            "limit": {"skip": 5}
        }"#;

        let request: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.from, "Foo");
        assert_eq!(request.select[1].alias.as_deref(), Some("child"));
        assert_eq!(
            request.where_clauses[0].value_set,
            Some(vec!["10".to_string(), "20".to_string()])
        );
        assert_eq!(request.order_by[0].direction, SortDirection::Desc);
        assert_eq!(request.limit, Some(Limit { skip: 5, take: 0 }));
    }

    #[test]
    fn test_from_accepts_bare_name() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"select": [{"selector": "a"}], "from": "Foo"}"#).unwrap();
        assert_eq!(request.from, "Foo");
        assert!(request.where_clauses.is_empty());
        assert!(request.limit.is_none());
    }

    #[test]
    fn test_unknown_direction_rejected() {
        let result: Result<SortKey, _> =
            serde_json::from_str(r#"{"selector": "a", "direction": "sideways"}"#);
        assert!(result.is_err());
    }
}
