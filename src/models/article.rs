use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::filter::{FieldValue, Queryable};
use crate::store::Entity;

/// Byte-coded publication status. Deleting an article flips this to
/// Inactive instead of removing the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Inactive,
    Active,
}

impl ArticleStatus {
    pub fn code(self) -> u8 {
        match self {
            ArticleStatus::Inactive => 0,
            ArticleStatus::Active => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ArticleStatus::Inactive),
            1 => Some(ArticleStatus::Active),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: i32,
    pub title: String,
    pub headline: Option<String>,
    pub content: String,
    pub source: Option<String>,
    pub category_id: i32,
    pub status: ArticleStatus,
    pub created_by: i32,
    pub updated_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    /// Associated tag ids, many-to-many.
    pub tag_ids: Vec<i32>,
}

impl Queryable for NewsArticle {
    fn entity_id(&self) -> i32 {
        self.id
    }

    fn fields() -> &'static [&'static str] {
        &[
            "id",
            "title",
            "headline",
            "content",
            "source",
            "category_id",
            "status",
            "created_by",
            "updated_by",
            "created_at",
            "updated_at",
            "tag_ids",
        ]
    }

    fn field(&self, name: &str) -> FieldValue {
        match name.to_ascii_lowercase().as_str() {
            "id" => FieldValue::Int(self.id),
            "title" => FieldValue::Text(self.title.clone()),
            "headline" => match &self.headline {
                Some(h) => FieldValue::Text(h.clone()),
                None => FieldValue::Null,
            },
            "content" => FieldValue::Text(self.content.clone()),
            "source" => match &self.source {
                Some(s) => FieldValue::Text(s.clone()),
                None => FieldValue::Null,
            },
            "category_id" => FieldValue::Int(self.category_id),
            "status" => FieldValue::Int(self.status.code() as i32),
            "created_by" => FieldValue::Int(self.created_by),
            "updated_by" => match self.updated_by {
                Some(id) => FieldValue::Int(id),
                None => FieldValue::Null,
            },
            "created_at" => FieldValue::Date(self.created_at),
            "updated_at" => match self.updated_at {
                Some(t) => FieldValue::Date(t),
                None => FieldValue::Null,
            },
            "tag_ids" => FieldValue::IntList(self.tag_ids.clone()),
            _ => FieldValue::Null,
        }
    }
}

impl Entity for NewsArticle {
    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }
}
