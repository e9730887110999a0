use std::cmp::Ordering;

use chrono::NaiveDateTime;

use super::text;
use super::types::{FieldValue, Queryable};

/// One clause of a composed filter. Every variant is a plain value so a
/// filter can be built from request input, logged, and handed to any store
/// adapter for evaluation.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Case- and accent-insensitive substring match on a text field.
    TextContains {
        field: &'static str,
        keyword: String,
    },
    /// Exact value match.
    Equals {
        field: &'static str,
        value: FieldValue,
    },
    /// Scalar field must be one of the listed ids. An empty list matches
    /// nothing.
    OneOf {
        field: &'static str,
        values: Vec<i32>,
    },
    /// Inclusive range; either bound may be open.
    Range {
        field: &'static str,
        min: Option<FieldValue>,
        max: Option<FieldValue>,
    },
    /// Id-list field must contain every listed id (conjunction, not union).
    ContainsAll {
        field: &'static str,
        values: Vec<i32>,
    },
}

impl Condition {
    pub fn matches<T: Queryable>(&self, entity: &T) -> bool {
        match self {
            Condition::TextContains { field, keyword } => match entity.field(field) {
                FieldValue::Text(value) => text::contains_insensitive(&value, keyword),
                _ => false,
            },
            Condition::Equals { field, value } => entity.field(field) == *value,
            Condition::OneOf { field, values } => match entity.field(field) {
                FieldValue::Int(value) => values.contains(&value),
                _ => false,
            },
            Condition::Range { field, min, max } => {
                let value = entity.field(field);
                if matches!(value, FieldValue::Null) {
                    return false;
                }
                if let Some(lower) = min {
                    if value.compare(lower) == Ordering::Less {
                        return false;
                    }
                }
                if let Some(upper) = max {
                    if value.compare(upper) == Ordering::Greater {
                        return false;
                    }
                }
                true
            }
            Condition::ContainsAll { field, values } => match entity.field(field) {
                FieldValue::IntList(list) => values.iter().all(|id| list.contains(id)),
                _ => false,
            },
        }
    }
}

/// AND-list of conditions. An empty set matches everything, so absent
/// request filters simply contribute nothing. Composition is associative
/// and order-independent.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    conditions: Vec<Condition>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds a text-contains clause. Blank or whitespace-only keywords are
    /// treated as absent.
    pub fn text_contains(self, field: &'static str, keyword: Option<&str>) -> Self {
        match keyword.map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => self.and(Condition::TextContains {
                field,
                keyword: keyword.to_string(),
            }),
            None => self,
        }
    }

    /// Adds an equality clause when the optional value is present.
    pub fn equals<V: Into<FieldValue>>(self, field: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.and(Condition::Equals {
                field,
                value: value.into(),
            }),
            None => self,
        }
    }

    /// Restricts a scalar field to a set of allowed ids. Unlike the other
    /// builders this always adds a clause: an empty allowed set must match
    /// nothing, not everything.
    pub fn one_of(self, field: &'static str, values: Vec<i32>) -> Self {
        self.and(Condition::OneOf { field, values })
    }

    /// Adds an inclusive date range when at least one bound is present.
    pub fn date_range(
        self,
        field: &'static str,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
    ) -> Self {
        if from.is_none() && to.is_none() {
            return self;
        }
        self.and(Condition::Range {
            field,
            min: from.map(FieldValue::Date),
            max: to.map(FieldValue::Date),
        })
    }

    /// Requires the id-list field to contain every given id. An empty list
    /// is treated as absent.
    pub fn contains_all(self, field: &'static str, values: &[i32]) -> Self {
        if values.is_empty() {
            return self;
        }
        self.and(Condition::ContainsAll {
            field,
            values: values.to_vec(),
        })
    }

    pub fn matches<T: Queryable>(&self, entity: &T) -> bool {
        self.conditions.iter().all(|c| c.matches(entity))
    }
}
