use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dropdown::{self, DropdownNode};
use crate::error::{ApiError, ApiResult};
use crate::filter::FilterSet;
use crate::hierarchy::CategoryHierarchy;
use crate::models::{Category, NewsArticle};
use crate::paging::{PageRequest, PagedResult};
use crate::services::trimmed;
use crate::store::Repository;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryQuery {
    #[serde(flatten)]
    pub page: PageRequest,
    pub name: Option<String>,
    pub parent_id: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DropdownRequest {
    #[serde(default)]
    pub include_inactive: bool,
    #[serde(default)]
    pub parents_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParentCategoryRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub parent: Option<ParentCategoryRef>,
    pub is_active: bool,
}

/// What a delete actually did; a category referenced by articles is
/// deactivated instead of removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDeleteOutcome {
    Deleted,
    Deactivated,
}

pub struct CategoryService {
    categories: Arc<dyn Repository<Category>>,
    articles: Arc<dyn Repository<NewsArticle>>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn Repository<Category>>,
        articles: Arc<dyn Repository<NewsArticle>>,
    ) -> Self {
        Self {
            categories,
            articles,
        }
    }

    pub async fn create(&self, request: &CreateCategoryRequest) -> ApiResult<i32> {
        Self::validate(&Some(request.name.clone()), &request.description, true)?;

        let name = request.name.trim().to_string();
        if self.name_taken(&name, None).await? {
            return Err(ApiError::conflict("Category with the same name already exists"));
        }

        let category = Category {
            id: 0,
            name,
            description: request.description.clone(),
            parent_id: request.parent_id,
            is_active: request.is_active,
        };
        let id = self.categories.add(category).await?;
        self.commit().await?;
        Ok(id)
    }

    pub async fn update(&self, id: i32, request: &UpdateCategoryRequest) -> ApiResult<i32> {
        let mut existing = self
            .categories
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category not found"))?;

        Self::validate(&request.name, &request.description, false)?;

        if let Some(name) = trimmed(&request.name) {
            if self.name_taken(&name, Some(id)).await? {
                return Err(ApiError::conflict("Another category with the same name exists"));
            }
            existing.name = name;
        }
        if let Some(description) = trimmed(&request.description) {
            existing.description = Some(description);
        }
        if let Some(parent_id) = request.parent_id {
            existing.parent_id = Some(parent_id);
        }
        if let Some(is_active) = request.is_active {
            existing.is_active = is_active;
        }

        self.categories.update(existing).await?;
        self.commit().await?;
        Ok(id)
    }

    /// Physical delete, unless articles still reference the category, in
    /// which case it is deactivated and kept.
    pub async fn delete(&self, id: i32) -> ApiResult<CategoryDeleteOutcome> {
        let mut existing = self
            .categories
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category not found"))?;

        let referenced = self
            .articles
            .any(&FilterSet::new().equals("category_id", Some(id)))
            .await?;

        if referenced {
            existing.is_active = false;
            self.categories.update(existing).await?;
            self.commit().await?;
            return Ok(CategoryDeleteOutcome::Deactivated);
        }

        self.categories.remove(id).await?;
        self.commit().await?;
        Ok(CategoryDeleteOutcome::Deleted)
    }

    pub async fn get_by_id(&self, id: i32) -> ApiResult<CategoryResponse> {
        let category = self
            .categories
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category not found"))?;

        let parent = match category.parent_id {
            Some(parent_id) => self
                .categories
                .get_by_id(parent_id)
                .await?
                .map(|p| ParentCategoryRef {
                    id: p.id,
                    name: p.name,
                }),
            None => None,
        };

        Ok(CategoryResponse {
            id: category.id,
            name: category.name,
            description: category.description,
            parent,
            is_active: category.is_active,
        })
    }

    pub async fn get_paged(&self, query: &CategoryQuery) -> ApiResult<PagedResult<CategoryResponse>> {
        let paging = query.page.normalize();
        let filter = FilterSet::new()
            .text_contains("name", query.name.as_deref())
            .equals("parent_id", query.parent_id)
            .equals("is_active", query.is_active);

        let (items, total) = self.categories.get_paged(&filter, &paging).await?;

        // one snapshot for parent-name resolution
        let all = self.categories.get_all(&FilterSet::new()).await?;
        let names: HashMap<i32, String> = all.into_iter().map(|c| (c.id, c.name)).collect();

        let responses = items
            .into_iter()
            .map(|c| {
                let parent = c.parent_id.and_then(|pid| {
                    names.get(&pid).map(|name| ParentCategoryRef {
                        id: pid,
                        name: name.clone(),
                    })
                });
                CategoryResponse {
                    id: c.id,
                    name: c.name,
                    description: c.description,
                    parent,
                    is_active: c.is_active,
                }
            })
            .collect();

        Ok(PagedResult::new(
            responses,
            paging.page_number,
            paging.page_size,
            total,
        ))
    }

    /// Dropdown forest. Unless inactive categories are requested, the set
    /// is reduced to effectively active categories first, so a broken
    /// ancestor chain removes the whole subtree rather than promoting its
    /// members to roots.
    pub async fn dropdown(&self, request: &DropdownRequest) -> ApiResult<Vec<DropdownNode>> {
        let all = self.categories.get_all(&FilterSet::new()).await?;

        let mut filtered: Vec<Category> = if request.include_inactive {
            all
        } else {
            let hierarchy = CategoryHierarchy::new(&all);
            all.into_iter()
                .filter(|c| hierarchy.is_effectively_active(c.id))
                .collect()
        };

        if request.parents_only {
            filtered.retain(|c| c.parent_id.is_none());
        }

        Ok(dropdown::build_tree(&filtered))
    }

    fn validate(
        name: &Option<String>,
        description: &Option<String>,
        name_required: bool,
    ) -> ApiResult<()> {
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
        if let Some(description) = description {
            if description.len() > 2000 {
                errors.insert(
                    "description".to_string(),
                    "Description must be at most 2000 characters".to_string(),
                );
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
            .categories
            .get_all(&FilterSet::new().equals("name", Some(name)))
            .await?;
        Ok(clashes.iter().any(|c| Some(c.id) != excluding))
    }

    async fn commit(&self) -> ApiResult<()> {
        if !self.categories.save_changes().await? {
            return Err(ApiError::persistence("Failed to save category changes"));
        }
        Ok(())
    }
}
