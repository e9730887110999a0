pub mod conditions;
pub mod order;
pub mod text;
pub mod types;

pub use conditions::{Condition, FilterSet};
pub use types::{FieldValue, Queryable, SortDirection};
