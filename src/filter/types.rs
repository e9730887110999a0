use std::cmp::Ordering;

use chrono::NaiveDateTime;

/// A single field value surfaced by an entity for filtering and sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i32),
    Text(String),
    Date(NaiveDateTime),
    IntList(Vec<i32>),
}

impl FieldValue {
    /// Total order used by the sort executor. Null sorts first; mismatched
    /// variants compare equal so a bad comparison degrades to the
    /// surrounding tie-break instead of panicking.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Less,
            (_, FieldValue::Null) => Ordering::Greater,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::IntList(a), FieldValue::IntList(b)) => a.len().cmp(&b.len()),
            _ => Ordering::Equal,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(v: NaiveDateTime) -> Self {
        FieldValue::Date(v)
    }
}

/// Field reflection used by the filter evaluator and the sort executor.
///
/// Field names are matched case-insensitively. `fields()` lists every
/// queryable attribute so callers can reject unknown sort keys up front;
/// `field` returns `FieldValue::Null` for both null values and unknown
/// names.
pub trait Queryable {
    fn entity_id(&self) -> i32;

    fn fields() -> &'static [&'static str]
    where
        Self: Sized;

    fn field(&self, name: &str) -> FieldValue;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}
