use serde::{Deserialize, Serialize};

use crate::filter::{FieldValue, Queryable};
use crate::store::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub note: Option<String>,
}

impl Queryable for Tag {
    fn entity_id(&self) -> i32 {
        self.id
    }

    fn fields() -> &'static [&'static str] {
        &["id", "name", "note"]
    }

    fn field(&self, name: &str) -> FieldValue {
        match name.to_ascii_lowercase().as_str() {
            "id" => FieldValue::Int(self.id),
            "name" => FieldValue::Text(self.name.clone()),
            "note" => match &self.note {
                Some(n) => FieldValue::Text(n.clone()),
                None => FieldValue::Null,
            },
            _ => FieldValue::Null,
        }
    }
}

impl Entity for Tag {
    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }
}
