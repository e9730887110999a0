#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Once;

use chrono::{NaiveDate, NaiveDateTime};

use news_api_rust::auth::{hash_password, Identity, JwtIssuer};
use news_api_rust::models::{
    AccountRole, ArticleStatus, Category, NewsArticle, SystemAccount, Tag,
};
use news_api_rust::registry::Registry;
use news_api_rust::store::MemoryRepository;

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init()
            .ok();
    });
}

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    day_of(year, month, day).and_hms_opt(9, 0, 0).unwrap()
}

pub fn day_of(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn admin() -> Identity {
    Identity {
        account_id: 1,
        role: AccountRole::Admin,
    }
}

pub fn staff(account_id: i32) -> Identity {
    Identity {
        account_id,
        role: AccountRole::Staff,
    }
}

pub fn account(id: i32, name: &str, email: &str, password: &str, role: AccountRole) -> SystemAccount {
    SystemAccount {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password),
        role,
    }
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

pub fn article(
    id: i32,
    title: &str,
    category_id: i32,
    created_by: i32,
    tag_ids: Vec<i32>,
    status: ArticleStatus,
    created_at: NaiveDateTime,
) -> NewsArticle {
    NewsArticle {
        id,
        title: title.to_string(),
        headline: Some(format!("{} headline", title)),
        content: format!("{} content", title),
        source: None,
        category_id,
        status,
        created_by,
        updated_by: None,
        created_at,
        updated_at: None,
        tag_ids,
    }
}

pub fn registry_with(
    accounts: Vec<SystemAccount>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    articles: Vec<NewsArticle>,
) -> Registry {
    init_tracing();
    Registry::build(
        Arc::new(MemoryRepository::seeded(accounts)),
        Arc::new(MemoryRepository::seeded(categories)),
        Arc::new(MemoryRepository::seeded(tags)),
        Arc::new(MemoryRepository::seeded(articles)),
        Arc::new(JwtIssuer),
    )
}

/// Standard newsroom fixture shared across the suites.
///
/// Accounts: 1 admin, 2 staff, 3 lecturer.
/// Categories: News (1, active root) <- Business (2, active); Archive
/// (3, inactive root) <- Dormant (4, active but chain broken).
/// Articles 1/2/4 live under active chains; article 3 sits under the
/// broken chain; article 4 is soft-deleted.
pub fn seeded_registry() -> Registry {
    registry_with(
        vec![
            account(1, "Alice", "alice@example.com", "Adm1n!pass", AccountRole::Admin),
            account(2, "Binh", "binh@example.com", "password123", AccountRole::Staff),
            account(3, "Chau", "chau@example.com", "lecture4me", AccountRole::Lecturer),
        ],
        vec![
            category(1, "News", None, true),
            category(2, "Business", Some(1), true),
            category(3, "Archive", None, false),
            category(4, "Dormant", Some(3), true),
        ],
        vec![tag(1, "breaking"), tag(2, "economy"), tag(3, "sports")],
        vec![
            article(
                1,
                "Market rally continues",
                2,
                2,
                vec![1, 2],
                ArticleStatus::Active,
                at(2024, 3, 1),
            ),
            article(
                2,
                "Đà Nẵng hosts festival",
                1,
                2,
                vec![1],
                ArticleStatus::Active,
                at(2024, 3, 2),
            ),
            article(
                3,
                "Old piece",
                4,
                1,
                vec![],
                ArticleStatus::Active,
                at(2024, 3, 2),
            ),
            article(
                4,
                "Retracted story",
                1,
                2,
                vec![1, 2, 3],
                ArticleStatus::Inactive,
                at(2024, 3, 3),
            ),
        ],
    )
}
