use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::{self, TokenIssuer};
use crate::error::{ApiError, ApiResult};
use crate::filter::FilterSet;
use crate::models::{AccountRole, NewsArticle, SystemAccount};
use crate::paging::{PageRequest, PagedResult};
use crate::services::{is_valid_email, trimmed};
use crate::store::Repository;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: AccountRole,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<AccountRole>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountQuery {
    #[serde(flatten)]
    pub page: PageRequest,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<AccountRole>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountLookupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<AccountRole>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
}

impl From<SystemAccount> for AccountResponse {
    fn from(account: SystemAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountLookup {
    pub id: i32,
    pub name: String,
    pub email: String,
}

pub struct AccountService {
    accounts: Arc<dyn Repository<SystemAccount>>,
    articles: Arc<dyn Repository<NewsArticle>>,
    issuer: Arc<dyn TokenIssuer>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn Repository<SystemAccount>>,
        articles: Arc<dyn Repository<NewsArticle>>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            articles,
            issuer,
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<String> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(ApiError::validation("Email and password are required"));
        }

        let matches = self
            .accounts
            .get_all(&FilterSet::new().equals("email", Some(request.email.trim())))
            .await?;
        let account = matches
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if auth::hash_password(&request.password) != account.password_hash {
            return Err(ApiError::unauthorized("Invalid password"));
        }

        let token = self.issuer.issue(&account, account.role)?;
        tracing::debug!(account_id = account.id, "login succeeded");
        Ok(token)
    }

    pub async fn create(&self, request: &CreateAccountRequest) -> ApiResult<i32> {
        Self::validate_create(request)?;

        let email = request.email.trim().to_string();
        if self.email_taken(&email, None).await? {
            return Err(ApiError::conflict(
                "An account with the provided email already exists",
            ));
        }

        let account = SystemAccount {
            id: 0,
            name: request.name.trim().to_string(),
            email,
            password_hash: auth::hash_password(&request.password),
            role: request.role,
        };
        let id = self.accounts.add(account).await?;
        self.commit().await?;
        Ok(id)
    }

    /// Administrative patch: only supplied fields are merged onto the
    /// record.
    pub async fn update(&self, id: i32, request: &UpdateAccountRequest) -> ApiResult<i32> {
        let mut existing = self
            .accounts
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Account not found"))?;

        Self::validate_update(request)?;

        if let Some(email) = trimmed(&request.email) {
            if self.email_taken(&email, Some(id)).await? {
                return Err(ApiError::conflict(
                    "Another account with the provided email already exists",
                ));
            }
        }

        Self::apply_update(&mut existing, request);
        self.accounts.update(existing).await?;
        self.commit().await?;
        Ok(id)
    }

    /// Self-service patch: no role change, relaxed password rule.
    pub async fn update_profile(
        &self,
        account_id: i32,
        request: &UpdateProfileRequest,
    ) -> ApiResult<i32> {
        let mut existing = self
            .accounts
            .get_by_id(account_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found"))?;

        Self::validate_profile(request)?;

        if let Some(email) = trimmed(&request.email) {
            if self.email_taken(&email, Some(account_id)).await? {
                return Err(ApiError::conflict(
                    "Another account with the provided email already exists",
                ));
            }
        }

        let admin_shape = UpdateAccountRequest {
            name: request.name.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
            role: None,
        };
        Self::apply_update(&mut existing, &admin_shape);
        self.accounts.update(existing).await?;
        self.commit().await?;
        Ok(account_id)
    }

    pub async fn delete(&self, id: i32) -> ApiResult<()> {
        let existing = self
            .accounts
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Account not found"))?;

        let authored = self
            .articles
            .any(&FilterSet::new().equals("created_by", Some(id)))
            .await?;
        if authored {
            return Err(ApiError::validation(
                "Cannot delete account because it has created news articles",
            ));
        }

        self.accounts.remove(existing.id).await?;
        self.commit().await
    }

    pub async fn get_by_id(&self, id: i32) -> ApiResult<AccountResponse> {
        let account = self
            .accounts
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Account not found"))?;
        Ok(account.into())
    }

    pub async fn get_paged(&self, query: &AccountQuery) -> ApiResult<PagedResult<AccountResponse>> {
        let paging = query.page.normalize();
        let filter = FilterSet::new()
            .text_contains("name", query.name.as_deref())
            .text_contains("email", query.email.as_deref())
            .equals("role", query.role.map(|r| r.code() as i32));

        let (items, total) = self.accounts.get_paged(&filter, &paging).await?;
        let responses: Vec<AccountResponse> = items.into_iter().map(Into::into).collect();
        Ok(PagedResult::new(
            responses,
            paging.page_number,
            paging.page_size,
            total,
        ))
    }

    /// Name-ordered id/name/email rows for pickers.
    pub async fn lookup(&self, request: &AccountLookupRequest) -> ApiResult<Vec<AccountLookup>> {
        let filter = FilterSet::new()
            .text_contains("name", request.name.as_deref())
            .text_contains("email", request.email.as_deref())
            .equals("role", request.role.map(|r| r.code() as i32));

        let mut accounts = self.accounts.get_all(&filter).await?;
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts
            .into_iter()
            .map(|a| AccountLookup {
                id: a.id,
                name: a.name,
                email: a.email,
            })
            .collect())
    }

    fn apply_update(account: &mut SystemAccount, request: &UpdateAccountRequest) {
        if let Some(name) = trimmed(&request.name) {
            account.name = name;
        }
        if let Some(email) = trimmed(&request.email) {
            account.email = email;
        }
        if let Some(role) = request.role {
            account.role = role;
        }
        if let Some(password) = request.password.as_deref().filter(|p| !p.trim().is_empty()) {
            account.password_hash = auth::hash_password(password);
        }
    }

    fn validate_create(request: &CreateAccountRequest) -> ApiResult<()> {
        let mut errors = HashMap::new();
        if request.name.trim().is_empty() {
            errors.insert("name".to_string(), "Name is required".to_string());
        } else if request.name.trim().len() > 100 {
            errors.insert("name".to_string(), "Name must be at most 100 characters".to_string());
        }
        if !is_valid_email(request.email.trim()) {
            errors.insert("email".to_string(), "Invalid email address".to_string());
        } else if request.email.trim().len() > 256 {
            errors.insert("email".to_string(), "Email must be at most 256 characters".to_string());
        }
        if request.password.len() < 6 {
            errors.insert(
                "password".to_string(),
                "Password must be at least 6 characters".to_string(),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_fields("Validation failed", errors))
        }
    }

    fn validate_update(request: &UpdateAccountRequest) -> ApiResult<()> {
        let mut errors = HashMap::new();
        if let Some(name) = trimmed(&request.name) {
            if name.len() > 100 {
                errors.insert("name".to_string(), "Name must be at most 100 characters".to_string());
            }
        }
        if let Some(email) = trimmed(&request.email) {
            if !is_valid_email(&email) {
                errors.insert("email".to_string(), "Invalid email address".to_string());
            }
        }
        if let Some(password) = request.password.as_deref().filter(|p| !p.trim().is_empty()) {
            if let Some(problem) = Self::password_complexity_error(password) {
                errors.insert("password".to_string(), problem);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_fields("Validation failed", errors))
        }
    }

    fn validate_profile(request: &UpdateProfileRequest) -> ApiResult<()> {
        let mut errors = HashMap::new();
        if let Some(name) = trimmed(&request.name) {
            if name.len() > 100 {
                errors.insert("name".to_string(), "Name must be at most 100 characters".to_string());
            }
        }
        if let Some(email) = trimmed(&request.email) {
            if !is_valid_email(&email) {
                errors.insert("email".to_string(), "Invalid email address".to_string());
            }
        }
        if let Some(password) = request.password.as_deref().filter(|p| !p.trim().is_empty()) {
            if password.len() < 6 {
                errors.insert(
                    "password".to_string(),
                    "Password must be at least 6 characters".to_string(),
                );
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_fields("Validation failed", errors))
        }
    }

    /// Administrative password rule: at least 8 characters with uppercase,
    /// lowercase, digit and special character.
    fn password_complexity_error(password: &str) -> Option<String> {
        if password.len() < 8 {
            return Some("Password must be at least 8 characters long".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Some("Password must contain at least one uppercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Some("Password must contain at least one lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Some("Password must contain at least one digit".to_string());
        }
        if !password.chars().any(|c| !c.is_alphanumeric()) {
            return Some("Password must contain at least one special character".to_string());
        }
        None
    }

    async fn email_taken(&self, email: &str, excluding: Option<i32>) -> ApiResult<bool> {
        let clashes = self
            .accounts
            .get_all(&FilterSet::new().equals("email", Some(email)))
            .await?;
        Ok(clashes.iter().any(|a| Some(a.id) != excluding))
    }

    async fn commit(&self) -> ApiResult<()> {
        if !self.accounts.save_changes().await? {
            return Err(ApiError::persistence("Failed to save account changes"));
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
        let mut account = testing::account(1, "ann", "ann@example.com");
        let before_hash = account.password_hash.clone();

        AccountService::apply_update(
            &mut account,
            &UpdateAccountRequest {
                email: Some("new@example.com".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(account.name, "ann");
        assert_eq!(account.email, "new@example.com");
        assert_eq!(account.password_hash, before_hash);
        assert_eq!(account.role, AccountRole::Staff);
    }

    #[test]
    fn blank_patch_fields_leave_record_untouched() {
        let mut account = testing::account(1, "ann", "ann@example.com");
        AccountService::apply_update(
            &mut account,
            &UpdateAccountRequest {
                name: Some("   ".to_string()),
                password: Some("".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(account.name, "ann");
    }

    #[test]
    fn complexity_rule_rejects_weak_admin_passwords() {
        assert!(AccountService::password_complexity_error("Sh0rt!").is_some());
        assert!(AccountService::password_complexity_error("alllowercase1!").is_some());
        assert!(AccountService::password_complexity_error("NOLOWER1!").is_some());
        assert!(AccountService::password_complexity_error("NoDigits!").is_some());
        assert!(AccountService::password_complexity_error("NoSpecial1").is_some());
        assert!(AccountService::password_complexity_error("Str0ng!pass").is_none());
    }
}
