use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use crate::filter::FilterSet;
use crate::hierarchy::CategoryHierarchy;
use crate::models::{ArticleStatus, Category, NewsArticle, SystemAccount, Tag};
use crate::paging::{PageRequest, PagedResult};
use crate::services::trimmed;
use crate::stats::{self, StatisticsReport};
use crate::store::Repository;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub headline: Option<String>,
    pub content: String,
    pub source: Option<String>,
    pub category_id: i32,
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub headline: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub category_id: Option<i32>,
    pub status: Option<ArticleStatus>,
    pub tag_ids: Option<Vec<i32>>,
}

/// Filters shared by the admin-wide and owner-scoped list queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleFilters {
    pub title: Option<String>,
    pub headline: Option<String>,
    pub source: Option<String>,
    pub category_id: Option<i32>,
    pub status: Option<ArticleStatus>,
    pub created_from: Option<NaiveDateTime>,
    pub created_to: Option<NaiveDateTime>,
    /// Single-tag convenience filter.
    pub tag_id: Option<i32>,
    /// Articles must carry every one of these tags.
    pub tag_ids: Option<Vec<i32>>,
    /// When false, articles whose category chain is broken are hidden.
    #[serde(default)]
    pub include_inactive_categories: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleQuery {
    #[serde(flatten)]
    pub filters: ArticleFilters,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    #[serde(flatten)]
    pub page: PageRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyArticlesQuery {
    #[serde(flatten)]
    pub filters: ArticleFilters,
    #[serde(flatten)]
    pub page: PageRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary {
    pub id: i32,
    pub title: String,
    pub headline: Option<String>,
    pub created_at: NaiveDateTime,
    pub category_name: String,
    pub status: ArticleStatus,
    pub author_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountRef {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetail {
    pub id: i32,
    pub title: String,
    pub headline: Option<String>,
    pub content: String,
    pub source: Option<String>,
    pub status: ArticleStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub category: CategoryRef,
    pub author: AccountRef,
    pub last_modified_by: Option<AccountRef>,
    pub tags: Vec<TagRef>,
}

pub struct ArticleService {
    articles: Arc<dyn Repository<NewsArticle>>,
    tags: Arc<dyn Repository<Tag>>,
    categories: Arc<dyn Repository<Category>>,
    accounts: Arc<dyn Repository<SystemAccount>>,
}

impl ArticleService {
    pub fn new(
        articles: Arc<dyn Repository<NewsArticle>>,
        tags: Arc<dyn Repository<Tag>>,
        categories: Arc<dyn Repository<Category>>,
        accounts: Arc<dyn Repository<SystemAccount>>,
    ) -> Self {
        Self {
            articles,
            tags,
            categories,
            accounts,
        }
    }

    pub async fn create(&self, caller: Identity, request: &CreateArticleRequest) -> ApiResult<i32> {
        Self::validate_create(request)?;

        if self.categories.get_by_id(request.category_id).await?.is_none() {
            return Err(ApiError::not_found("Category not found"));
        }

        let tag_ids = match &request.tag_ids {
            Some(ids) => self.existing_tag_ids(ids).await?,
            None => Vec::new(),
        };

        let article = NewsArticle {
            id: 0,
            title: request.title.trim().to_string(),
            headline: request.headline.clone(),
            content: request.content.clone(),
            source: request.source.clone(),
            category_id: request.category_id,
            status: ArticleStatus::Active,
            created_by: caller.account_id,
            updated_by: None,
            created_at: Utc::now().naive_utc(),
            updated_at: None,
            tag_ids,
        };
        let id = self.articles.add(article).await?;
        self.commit().await?;
        Ok(id)
    }

    pub async fn update(
        &self,
        caller: Identity,
        id: i32,
        request: &UpdateArticleRequest,
    ) -> ApiResult<i32> {
        let mut existing = self
            .articles
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("News article not found"))?;

        if !caller.can_manage(existing.created_by) {
            return Err(ApiError::forbidden("You can only modify articles you created"));
        }

        Self::validate_update(request)?;

        if let Some(category_id) = request.category_id {
            if self.categories.get_by_id(category_id).await?.is_none() {
                return Err(ApiError::not_found("Category not found"));
            }
        }

        Self::apply_update(&mut existing, request);

        // Tag set replacement, restricted to tags that actually exist.
        if let Some(ids) = &request.tag_ids {
            existing.tag_ids = self.existing_tag_ids(ids).await?;
        }

        existing.updated_by = Some(caller.account_id);
        existing.updated_at = Some(Utc::now().naive_utc());

        self.articles.update(existing).await?;
        self.commit().await?;
        Ok(id)
    }

    /// Soft delete: the article is deactivated, never removed.
    pub async fn delete(&self, caller: Identity, id: i32) -> ApiResult<()> {
        let mut existing = self
            .articles
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("News article not found"))?;

        if !caller.can_manage(existing.created_by) {
            return Err(ApiError::forbidden("You can only delete articles you created"));
        }

        existing.status = ArticleStatus::Inactive;
        self.articles.update(existing).await?;
        self.commit().await
    }

    pub async fn get_by_id(&self, id: i32) -> ApiResult<ArticleDetail> {
        let article = self
            .articles
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("News article not found"))?;

        let category = self
            .categories
            .get_by_id(article.category_id)
            .await?
            .map(|c| CategoryRef {
                id: c.id,
                name: c.name,
            })
            .unwrap_or(CategoryRef {
                id: article.category_id,
                name: String::new(),
            });

        let author = self.account_ref(article.created_by).await?;
        let last_modified_by = match article.updated_by {
            Some(editor) => Some(self.account_ref(editor).await?),
            None => None,
        };

        let all_tags = self.tags.get_all(&FilterSet::new()).await?;
        let by_id: HashMap<i32, &Tag> = all_tags.iter().map(|t| (t.id, t)).collect();
        let tags = article
            .tag_ids
            .iter()
            .filter_map(|id| {
                by_id.get(id).map(|t| TagRef {
                    id: t.id,
                    name: t.name.clone(),
                })
            })
            .collect();

        Ok(ArticleDetail {
            id: article.id,
            title: article.title,
            headline: article.headline,
            content: article.content,
            source: article.source,
            status: article.status,
            created_at: article.created_at,
            updated_at: article.updated_at,
            category,
            author,
            last_modified_by,
            tags,
        })
    }

    pub async fn get_paged(&self, query: &ArticleQuery) -> ApiResult<PagedResult<ArticleSummary>> {
        let paging = query.page.normalize();
        let filter = Self::shared_filter(&query.filters)
            .equals("created_by", query.created_by)
            .equals("updated_by", query.updated_by);

        self.run_paged(filter, &query.filters, paging).await
    }

    /// Owner-scoped listing: same filters, with the author pinned to the
    /// calling identity.
    pub async fn get_mine(
        &self,
        owner_id: i32,
        query: &MyArticlesQuery,
    ) -> ApiResult<PagedResult<ArticleSummary>> {
        if owner_id <= 0 {
            return Err(ApiError::validation("Invalid owner id"));
        }

        let paging = query.page.normalize();
        let filter = Self::shared_filter(&query.filters).equals("created_by", Some(owner_id));

        self.run_paged(filter, &query.filters, paging).await
    }

    pub async fn statistics(&self, request: &StatisticsRequest) -> ApiResult<StatisticsReport> {
        if request.end_date < request.start_date {
            return Err(ApiError::validation(
                "End date must be greater than or equal to start date",
            ));
        }

        let start = request.start_date.and_time(NaiveTime::MIN);
        let end_of_day =
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        let end = request.end_date.and_time(end_of_day);

        let in_range = self
            .articles
            .get_all(&FilterSet::new().date_range("created_at", Some(start), Some(end)))
            .await?;
        let categories = self.categories.get_all(&FilterSet::new()).await?;
        let accounts = self.accounts.get_all(&FilterSet::new()).await?;
        let hierarchy = CategoryHierarchy::new(&categories);

        Ok(stats::build_report(
            start,
            end,
            &in_range,
            &categories,
            &accounts,
            &hierarchy,
        ))
    }

    fn shared_filter(filters: &ArticleFilters) -> FilterSet {
        let mut filter = FilterSet::new()
            .text_contains("title", filters.title.as_deref())
            .text_contains("headline", filters.headline.as_deref())
            .text_contains("source", filters.source.as_deref())
            .equals("category_id", filters.category_id)
            .equals("status", filters.status.map(|s| s.code() as i32))
            .date_range("created_at", filters.created_from, filters.created_to);

        if let Some(tag) = filters.tag_id {
            filter = filter.contains_all("tag_ids", &[tag]);
        }
        if let Some(tags) = &filters.tag_ids {
            filter = filter.contains_all("tag_ids", tags);
        }
        filter
    }

    async fn run_paged(
        &self,
        mut filter: FilterSet,
        filters: &ArticleFilters,
        paging: crate::paging::Paging,
    ) -> ApiResult<PagedResult<ArticleSummary>> {
        if !filters.include_inactive_categories {
            let categories = self.categories.get_all(&FilterSet::new()).await?;
            let hierarchy = CategoryHierarchy::new(&categories);
            let allowed = hierarchy.active_ids();
            if allowed.is_empty() {
                return Ok(PagedResult::empty(&paging));
            }
            filter = filter.one_of("category_id", allowed);
        }

        let (items, total) = self.articles.get_paged(&filter, &paging).await?;
        let summaries = self.summarize(items).await?;
        Ok(PagedResult::new(
            summaries,
            paging.page_number,
            paging.page_size,
            total,
        ))
    }

    async fn summarize(&self, articles: Vec<NewsArticle>) -> ApiResult<Vec<ArticleSummary>> {
        let categories = self.categories.get_all(&FilterSet::new()).await?;
        let category_names: HashMap<i32, String> =
            categories.into_iter().map(|c| (c.id, c.name)).collect();
        let accounts = self.accounts.get_all(&FilterSet::new()).await?;
        let account_names: HashMap<i32, String> =
            accounts.into_iter().map(|a| (a.id, a.name)).collect();

        Ok(articles
            .into_iter()
            .map(|a| ArticleSummary {
                id: a.id,
                title: a.title,
                headline: a.headline,
                created_at: a.created_at,
                category_name: category_names
                    .get(&a.category_id)
                    .cloned()
                    .unwrap_or_default(),
                status: a.status,
                author_name: account_names.get(&a.created_by).cloned().unwrap_or_default(),
            })
            .collect())
    }

    async fn account_ref(&self, id: i32) -> ApiResult<AccountRef> {
        Ok(self
            .accounts
            .get_by_id(id)
            .await?
            .map(|a| AccountRef {
                id: a.id,
                name: a.name,
                email: a.email,
            })
            .unwrap_or(AccountRef {
                id,
                name: String::new(),
                email: String::new(),
            }))
    }

    /// Requested tag ids reduced to those that exist, original order kept.
    async fn existing_tag_ids(&self, requested: &[i32]) -> ApiResult<Vec<i32>> {
        let tags = self.tags.get_all(&FilterSet::new()).await?;
        let known: HashMap<i32, ()> = tags.into_iter().map(|t| (t.id, ())).collect();
        let mut seen = Vec::new();
        for &id in requested {
            if known.contains_key(&id) && !seen.contains(&id) {
                seen.push(id);
            }
        }
        Ok(seen)
    }

    fn apply_update(article: &mut NewsArticle, request: &UpdateArticleRequest) {
        if let Some(title) = trimmed(&request.title) {
            article.title = title;
        }
        if let Some(headline) = trimmed(&request.headline) {
            article.headline = Some(headline);
        }
        if let Some(content) = request.content.as_deref().filter(|c| !c.trim().is_empty()) {
            article.content = content.to_string();
        }
        if let Some(source) = trimmed(&request.source) {
            article.source = Some(source);
        }
        if let Some(category_id) = request.category_id {
            article.category_id = category_id;
        }
        if let Some(status) = request.status {
            article.status = status;
        }
    }

    fn validate_create(request: &CreateArticleRequest) -> ApiResult<()> {
        let mut errors = HashMap::new();
        if request.title.trim().is_empty() {
            errors.insert("title".to_string(), "Title is required".to_string());
        } else if request.title.trim().len() > 400 {
            errors.insert("title".to_string(), "Title must be at most 400 characters".to_string());
        }
        if request.content.trim().is_empty() {
            errors.insert("content".to_string(), "Content is required".to_string());
        }
        if request.category_id <= 0 {
            errors.insert(
                "category_id".to_string(),
                "Category id must be greater than zero".to_string(),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_fields("Validation failed", errors))
        }
    }

    fn validate_update(request: &UpdateArticleRequest) -> ApiResult<()> {
        let mut errors = HashMap::new();
        if let Some(title) = trimmed(&request.title) {
            if title.len() > 400 {
                errors.insert("title".to_string(), "Title must be at most 400 characters".to_string());
            }
        }
        if let Some(category_id) = request.category_id {
            if category_id <= 0 {
                errors.insert(
                    "category_id".to_string(),
                    "Category id must be greater than zero".to_string(),
                );
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_fields("Validation failed", errors))
        }
    }

    async fn commit(&self) -> ApiResult<()> {
        if !self.articles.save_changes().await? {
            return Err(ApiError::persistence("Failed to save article changes"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn patch_merges_only_supplied_fields() {
        let mut article = testing::article(1, "old title", 3, 7);
        article.source = Some("wire".to_string());

        ArticleService::apply_update(
            &mut article,
            &UpdateArticleRequest {
                title: Some("new title".to_string()),
                status: Some(ArticleStatus::Inactive),
                ..Default::default()
            },
        );

        assert_eq!(article.title, "new title");
        assert_eq!(article.status, ArticleStatus::Inactive);
        assert_eq!(article.source.as_deref(), Some("wire"));
        assert_eq!(article.category_id, 3);
        assert_eq!(article.content, "old title content");
    }

    #[test]
    fn blank_strings_do_not_overwrite() {
        let mut article = testing::article(1, "title", 3, 7);
        ArticleService::apply_update(
            &mut article,
            &UpdateArticleRequest {
                title: Some("  ".to_string()),
                content: Some("".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(article.title, "title");
        assert_eq!(article.content, "title content");
    }
}
