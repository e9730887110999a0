//! Shared fixtures for unit tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{AccountRole, ArticleStatus, Category, NewsArticle, SystemAccount, Tag};

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn category(id: i32, name: &str, parent_id: Option<i32>, is_active: bool) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: None,
        parent_id,
        is_active,
    }
}

pub fn tag(id: i32, name: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
        note: None,
    }
}

pub fn account(id: i32, name: &str, email: &str) -> SystemAccount {
    SystemAccount {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_hash: crate::auth::hash_password("s3cret"),
        role: AccountRole::Staff,
    }
}

pub fn article(id: i32, title: &str, category_id: i32, created_by: i32) -> NewsArticle {
    NewsArticle {
        id,
        title: title.to_string(),
        headline: None,
        content: format!("{} content", title),
        source: None,
        category_id,
        status: ArticleStatus::Active,
        created_by,
        updated_by: None,
        created_at: at(2024, 1, 1),
        updated_at: None,
        tag_ids: Vec::new(),
    }
}

pub fn article_on(
    id: i32,
    category_id: i32,
    created_by: i32,
    created_at: NaiveDateTime,
    status: ArticleStatus,
) -> NewsArticle {
    NewsArticle {
        id,
        title: format!("article {}", id),
        headline: None,
        content: "content".to_string(),
        source: None,
        category_id,
        status,
        created_by,
        updated_by: None,
        created_at,
        updated_at: None,
        tag_ids: Vec::new(),
    }
}
