use serde::{Deserialize, Serialize};

use crate::filter::{FieldValue, Queryable};
use crate::store::Entity;

/// A news category. `parent_id` is a self-reference forming a forest; the
/// data does not guarantee the absence of cycles, which is why effective
/// active state is resolved through `hierarchy::CategoryHierarchy` rather
/// than by chasing parents directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub is_active: bool,
}

impl Queryable for Category {
    fn entity_id(&self) -> i32 {
        self.id
    }

    fn fields() -> &'static [&'static str] {
        &["id", "name", "description", "parent_id", "is_active"]
    }

    fn field(&self, name: &str) -> FieldValue {
        match name.to_ascii_lowercase().as_str() {
            "id" => FieldValue::Int(self.id),
            "name" => FieldValue::Text(self.name.clone()),
            "description" => match &self.description {
                Some(d) => FieldValue::Text(d.clone()),
                None => FieldValue::Null,
            },
            "parent_id" => match self.parent_id {
                Some(id) => FieldValue::Int(id),
                None => FieldValue::Null,
            },
            "is_active" => FieldValue::Bool(self.is_active),
            _ => FieldValue::Null,
        }
    }
}

impl Entity for Category {
    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }
}
