//! Composition root. Every capability is mapped to its implementation
//! statically; there is no runtime discovery or convention scanning.

use std::sync::Arc;

use crate::auth::{JwtIssuer, TokenIssuer};
use crate::models::{Category, NewsArticle, SystemAccount, Tag};
use crate::services::{AccountService, ArticleService, CategoryService, TagService};
use crate::store::{MemoryRepository, Repository};

pub struct Registry {
    pub accounts: AccountService,
    pub categories: CategoryService,
    pub tags: TagService,
    pub articles: ArticleService,
}

impl Registry {
    /// Wires all services against a fresh in-memory store and the JWT
    /// issuer.
    pub fn with_memory_store() -> Self {
        Self::build(
            Arc::new(MemoryRepository::<SystemAccount>::new()),
            Arc::new(MemoryRepository::<Category>::new()),
            Arc::new(MemoryRepository::<Tag>::new()),
            Arc::new(MemoryRepository::<NewsArticle>::new()),
            Arc::new(JwtIssuer),
        )
    }

    pub fn build(
        accounts: Arc<dyn Repository<SystemAccount>>,
        categories: Arc<dyn Repository<Category>>,
        tags: Arc<dyn Repository<Tag>>,
        articles: Arc<dyn Repository<NewsArticle>>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            accounts: AccountService::new(accounts.clone(), articles.clone(), issuer),
            categories: CategoryService::new(categories.clone(), articles.clone()),
            tags: TagService::new(tags.clone(), articles.clone()),
            articles: ArticleService::new(articles, tags, categories, accounts),
        }
    }
}
