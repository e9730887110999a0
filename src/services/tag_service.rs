use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{ApiError, ApiResult};
use crate::filter::FilterSet;
use crate::models::{NewsArticle, Tag};
use crate::paging::{PageRequest, PagedResult};
use crate::services::trimmed;
use crate::store::Repository;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagQuery {
    #[serde(flatten)]
    pub page: PageRequest,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub note: Option<String>,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            note: tag.note,
        }
    }
}

pub struct TagService {
    tags: Arc<dyn Repository<Tag>>,
    articles: Arc<dyn Repository<NewsArticle>>,
}

impl TagService {
    pub fn new(tags: Arc<dyn Repository<Tag>>, articles: Arc<dyn Repository<NewsArticle>>) -> Self {
        Self { tags, articles }
    }

    pub async fn create(&self, request: &CreateTagRequest) -> ApiResult<i32> {
        Self::validate(&Some(request.name.clone()), &request.note, true)?;

        let name = request.name.trim().to_string();
        if self.name_taken(&name, None).await? {
            return Err(ApiError::conflict("Tag with the same name already exists"));
        }

        let tag = Tag {
            id: 0,
            name,
            note: request.note.clone(),
        };
        let id = self.tags.add(tag).await?;
        self.commit().await?;
        Ok(id)
    }

    pub async fn update(&self, id: i32, request: &UpdateTagRequest) -> ApiResult<i32> {
        let mut existing = self
            .tags
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Tag not found"))?;

        Self::validate(&request.name, &request.note, false)?;

        if let Some(name) = trimmed(&request.name) {
            if self.name_taken(&name, Some(id)).await? {
                return Err(ApiError::conflict("Another tag with the same name exists"));
            }
            existing.name = name;
        }
        if let Some(note) = trimmed(&request.note) {
            existing.note = Some(note);
        }

        self.tags.update(existing).await?;
        self.commit().await?;
        Ok(id)
    }

    pub async fn delete(&self, id: i32) -> ApiResult<()> {
        if self.tags.get_by_id(id).await?.is_none() {
            return Err(ApiError::not_found("Tag not found"));
        }

        let in_use = self
            .articles
            .any(&FilterSet::new().contains_all("tag_ids", &[id]))
            .await?;
        if in_use {
            return Err(ApiError::validation(
                "Cannot delete tag because it is used by news articles",
            ));
        }

        self.tags.remove(id).await?;
        self.commit().await
    }

    pub async fn get_by_id(&self, id: i32) -> ApiResult<TagResponse> {
        let tag = self
            .tags
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Tag not found"))?;
        Ok(tag.into())
    }

    pub async fn get_paged(&self, query: &TagQuery) -> ApiResult<PagedResult<TagResponse>> {
        let paging = query.page.normalize();
        let filter = FilterSet::new().text_contains("name", query.name.as_deref());

        let (items, total) = self.tags.get_paged(&filter, &paging).await?;
        let responses: Vec<TagResponse> = items.into_iter().map(Into::into).collect();
        Ok(PagedResult::new(
            responses,
            paging.page_number,
            paging.page_size,
            total,
        ))
    }

    /// Autocomplete helper: a blank keyword suggests nothing, anything else
    /// returns the first matches ordered by name, capped by configuration.
    pub async fn suggest(&self, keyword: Option<&str>) -> ApiResult<Vec<TagResponse>> {
        let keyword = match keyword.map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => keyword,
            None => return Ok(Vec::new()),
        };

        let filter = FilterSet::new().text_contains("name", Some(keyword));
        let mut tags = self.tags.get_all(&filter).await?;
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags
            .into_iter()
            .take(config::config().lookup.tag_suggestion_limit)
            .map(Into::into)
            .collect())
    }

    fn validate(name: &Option<String>, note: &Option<String>, name_required: bool) -> ApiResult<()> {
        let mut errors = HashMap::new();
        match trimmed(name) {
            Some(name) if name.len() > 200 => {
                errors.insert("name".to_string(), "Name must be at most 200 characters".to_string());
            }
            None if name_required => {
                errors.insert("name".to_string(), "Name is required".to_string());
            }
            _ => {}
        }
        if let Some(note) = note {
            if note.len() > 1000 {
                errors.insert("note".to_string(), "Note must be at most 1000 characters".to_string());
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_fields("Validation failed", errors))
        }
    }

    async fn name_taken(&self, name: &str, excluding: Option<i32>) -> ApiResult<bool> {
        let clashes = self
            .tags
            .get_all(&FilterSet::new().equals("name", Some(name)))
            .await?;
        Ok(clashes.iter().any(|t| Some(t.id) != excluding))
    }

    async fn commit(&self) -> ApiResult<()> {
        if !self.tags.save_changes().await? {
            return Err(ApiError::persistence("Failed to save tag changes"));
        }
        Ok(())
    }
}
