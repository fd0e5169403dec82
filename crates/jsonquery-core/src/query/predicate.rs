/// Filter compilation
///
/// Compiles the `where` clauses of a request into a single [`Predicate`].
/// Clauses are AND-combined; there is no OR grouping.
use super::request::FilterClause;
use super::selector::{resolve, ResolvedSelector};
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::value::Value;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq, // =
    Ne, // !=
    Gt, // >
    Ge, // >=
    Lt, // <
    Le, // <=
    In, // IN
}

impl Operator {
    /// Evaluate a relational operator on two values. `In` never matches here.
    pub fn compare(&self, left: &Value, right: &Value) -> bool {
        match self {
            Operator::Eq => left.equals(right),
            Operator::Ne => !left.equals(right),
            Operator::Gt => left.partial_compare(right) == Some(Ordering::Greater),
            Operator::Ge => matches!(
                left.partial_compare(right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Lt => left.partial_compare(right) == Some(Ordering::Less),
            Operator::Le => matches!(
                left.partial_compare(right),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::In => false,
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            "in" => Ok(Operator::In),
            _ => Err(Error::UnsupportedOperator(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Eq => write!(f, "="),
            Operator::Ne => write!(f, "!="),
            Operator::Gt => write!(f, ">"),
            Operator::Ge => write!(f, ">="),
            Operator::Lt => write!(f, "<"),
            Operator::Le => write!(f, "<="),
            Operator::In => write!(f, "IN"),
        }
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone)]
pub enum Operand {
    /// Coerced constant
    Literal(Value),
    /// Another field of the same element
    Field(ResolvedSelector),
    /// Coerced constants for `IN`
    Set(Vec<Value>),
}

/// One compiled clause
#[derive(Debug, Clone)]
pub struct Condition {
    left: ResolvedSelector,
    op: Operator,
    right: Operand,
}

impl Condition {
    pub fn evaluate(&self, element: &dyn Any) -> bool {
        let left = self.left.read(element);
        match &self.right {
            Operand::Literal(value) => self.op.compare(&left, value),
            Operand::Field(selector) => self.op.compare(&left, &selector.read(element)),
            Operand::Set(values) => values.iter().any(|v| left.equals(v)),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.left.path(), self.op)?;
        match &self.right {
            Operand::Literal(value) => write!(f, "'{}'", value),
            Operand::Field(selector) => write!(f, "{}", selector.path()),
            Operand::Set(values) => {
                write!(f, "(")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}'", v)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// AND of all compiled clauses
#[derive(Debug, Clone)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// True when the element satisfies every clause
    pub fn matches(&self, element: &dyn Any) -> bool {
        self.conditions.iter().all(|c| c.evaluate(element))
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{}", condition)?;
        }
        Ok(())
    }
}

/// Compile every clause against `schema`. Fails on the first malformed clause.
pub fn compile(schema: &Schema, clauses: &[FilterClause]) -> Result<Predicate> {
    let conditions = clauses
        .iter()
        .map(|clause| compile_clause(schema, clause))
        .collect::<Result<Vec<_>>>()?;
    Ok(Predicate { conditions })
}

fn compile_clause(schema: &Schema, clause: &FilterClause) -> Result<Condition> {
    let left = resolve(schema, &clause.selector)?;
    let op: Operator = clause.operator.parse()?;

    // Empty strings and empty sets count as absent
    let value = clause.value.as_deref().filter(|v| !v.is_empty());
    let value_set = clause.value_set.as_deref().filter(|v| !v.is_empty());

    let right = match (op, value, value_set) {
        (_, Some(_), Some(_)) => {
            return Err(Error::Validation(format!(
                "Clause '{}' sets both value and valueSet",
                clause
            )));
        }
        (_, None, None) => {
            return Err(Error::Validation(format!(
                "Clause '{}' has neither value nor valueSet",
                clause
            )));
        }
        (Operator::In, None, Some(values)) => Operand::Set(
            values
                .iter()
                .map(|v| left.kind().coerce(unquote(v).unwrap_or(v)))
                .collect::<Result<Vec<_>>>()?,
        ),
        (Operator::In, Some(_), None) => {
            return Err(Error::Validation(format!(
                "Clause '{}' uses IN and needs a valueSet",
                clause
            )));
        }
        (_, None, Some(_)) => {
            return Err(Error::Validation(format!(
                "Clause '{}' uses {} and needs a single value",
                clause, op
            )));
        }
        (_, Some(text), None) => match unquote(text) {
            Some(literal) => Operand::Literal(left.kind().coerce(literal)?),
            None => {
                let other = resolve(schema, text)?;
                if !left.kind().is_comparable_with(other.kind()) {
                    return Err(Error::coercion(text, left.kind()));
                }
                Operand::Field(other)
            }
        },
    };

    Ok(Condition { left, op, right })
}

/// Inner text of a `'quoted'` literal
fn unquote(text: &str) -> Option<&str> {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}
