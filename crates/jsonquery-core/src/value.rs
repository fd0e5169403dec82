//! Value model shared by filtering, ordering and projection.
//!
//! A record field is exposed to the engine as one of a closed set of
//! [`ValueKind`]s. Literals from a request are coerced to the kind of the
//! field they are compared against, so every comparison happens between
//! values of a known kind.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Primitive type category of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Signed integers up to 64 bits
    Integer,
    /// Decimal or floating point numbers
    Float,
    /// UTF-8 text
    String,
    /// Date and time without a zone
    DateTime,
    /// `true` or `false`
    Boolean,
}

/// A single cell value.
///
/// Serializes untagged, so a row encodes as a plain JSON array. There is no
/// `Deserialize`: untagged text cannot tell a `String` from a `DateTime`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer cell
    Integer(i64),
    /// Decimal or float cell
    Float(f64),
    /// Boolean cell
    Boolean(bool),
    /// Date/time cell, encoded as an ISO-8601 string
    DateTime(NaiveDateTime),
    /// Text cell
    String(String),
    /// Absent optional field or nested record
    Null,
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl ValueKind {
    /// Convert literal text from a request into a value of this kind.
    pub fn coerce(self, literal: &str) -> Result<Value> {
        let text = literal.trim();
        let value = match self {
            ValueKind::Integer => text.parse::<i64>().ok().map(Value::Integer),
            ValueKind::Float => text
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            // Strings are taken verbatim, whitespace included
            ValueKind::String => Some(Value::String(literal.to_string())),
            ValueKind::DateTime => parse_datetime(text).map(Value::DateTime),
            ValueKind::Boolean => match text.to_ascii_lowercase().as_str() {
                "true" => Some(Value::Boolean(true)),
                "false" => Some(Value::Boolean(false)),
                _ => None,
            },
        };

        value.ok_or_else(|| Error::coercion(literal, self))
    }

    /// Whether values of the two kinds can be compared with each other.
    pub fn is_comparable_with(self, other: ValueKind) -> bool {
        self == other || (self.is_numeric() && other.is_numeric())
    }

    fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Float)
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl Value {
    /// Kind of this value, `None` for `Null`
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Integer(_) => Some(ValueKind::Integer),
            Value::Float(_) => Some(ValueKind::Float),
            Value::String(_) => Some(ValueKind::String),
            Value::DateTime(_) => Some(ValueKind::DateTime),
            Value::Boolean(_) => Some(ValueKind::Boolean),
            Value::Null => None,
        }
    }

    /// Whether this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Equality as used by `=`, `!=` and `IN`.
    ///
    /// Integers and floats compare numerically. `Null` only equals `Null`.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            _ => self.partial_compare(other) == Some(Ordering::Equal),
        }
    }

    /// Natural ordering used by the relational operators.
    ///
    /// Returns `None` when either side is `Null` or the kinds are unrelated.
    pub fn partial_compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => compare_int_float(*a, *b),
            (Value::Float(a), Value::Integer(b)) => compare_int_float(*b, *a).map(Ordering::reverse),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total ordering used for sorting.
    ///
    /// `Null` sorts first; values of unrelated kinds order by kind.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Integer(a), Value::Float(b)) => {
                compare_int_float(*a, *b).unwrap_or_else(|| (*a as f64).total_cmp(b))
            }
            (Value::Float(a), Value::Integer(b)) => {
                compare_int_float(*b, *a)
                    .map(Ordering::reverse)
                    .unwrap_or_else(|| a.total_cmp(&(*b as f64)))
            }
            _ => self
                .partial_compare(other)
                .unwrap_or_else(|| self.rank().cmp(&other.rank())),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) | Value::Float(_) => 2,
            Value::DateTime(_) => 3,
            Value::String(_) => 4,
        }
    }
}

/// Exact ordering of an integer against a float, `None` for NaN.
///
/// `i64 as f64` rounds above 2^53, so the float is truncated to an integer
/// instead and only its fractional part breaks ties.
fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= LIMIT {
        return Some(Ordering::Less);
    }
    if float < -LIMIT {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&float),
        ordering => Some(ordering),
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Integer => write!(f, "Integer"),
            ValueKind::Float => write!(f, "Float"),
            ValueKind::String => write!(f, "String"),
            ValueKind::DateTime => write!(f, "DateTime"),
            ValueKind::Boolean => write!(f, "Boolean"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => write!(f, "NULL"),
        }
    }
}

/// Rust field types that can back a queryable record field.
pub trait FieldValue {
    /// The kind every value of this type reports
    const KIND: ValueKind;

    /// Convert into a cell value
    fn into_value(self) -> Value;
}

macro_rules! integer_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                const KIND: ValueKind = ValueKind::Integer;

                fn into_value(self) -> Value {
                    Value::Integer(i64::from(self))
                }
            }
        )*
    };
}

integer_field_value!(i8, i16, i32, i64, u8, u16, u32);

impl FieldValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FieldValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl FieldValue for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl FieldValue for NaiveDateTime {
    const KIND: ValueKind = ValueKind::DateTime;

    fn into_value(self) -> Value {
        Value::DateTime(self)
    }
}

impl FieldValue for NaiveDate {
    const KIND: ValueKind = ValueKind::DateTime;

    fn into_value(self) -> Value {
        self.and_hms_opt(0, 0, 0)
            .map(Value::DateTime)
            .unwrap_or(Value::Null)
    }
}

impl FieldValue for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::DateTime;

    fn into_value(self) -> Value {
        Value::DateTime(self.naive_utc())
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    const KIND: ValueKind = V::KIND;

    fn into_value(self) -> Value {
        self.map(FieldValue::into_value).unwrap_or(Value::Null)
    }
}
