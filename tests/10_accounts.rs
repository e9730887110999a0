mod common;

use anyhow::Result;

use news_api_rust::error::ApiError;
use news_api_rust::models::AccountRole;
use news_api_rust::paging::PageRequest;
use news_api_rust::services::account_service::{
    AccountLookupRequest, AccountQuery, CreateAccountRequest, LoginRequest, UpdateAccountRequest,
    UpdateProfileRequest,
};

#[tokio::test]
async fn login_returns_signed_token_for_valid_credentials() -> Result<()> {
    let registry = common::seeded_registry();
    let token = registry
        .accounts
        .login(&LoginRequest {
            email: "binh@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await?;
    assert_eq!(token.split('.').count(), 3);
    Ok(())
}

#[tokio::test]
async fn login_with_unknown_email_is_not_found() {
    let registry = common::seeded_registry();
    let err = registry
        .accounts
        .login(&LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "whatever".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let registry = common::seeded_registry();
    let err = registry
        .accounts
        .login(&LoginRequest {
            email: "binh@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn create_rejects_duplicate_email_with_conflict() {
    let registry = common::seeded_registry();
    let err = registry
        .accounts
        .create(&CreateAccountRequest {
            name: "Impostor".to_string(),
            email: "binh@example.com".to_string(),
            password: "secret99".to_string(),
            role: AccountRole::Staff,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn create_surfaces_field_level_validation_errors() {
    let registry = common::seeded_registry();
    let err = registry
        .accounts
        .create(&CreateAccountRequest {
            name: "".to_string(),
            email: "not-an-email".to_string(),
            password: "abc".to_string(),
            role: AccountRole::Staff,
        })
        .await
        .unwrap_err();

    match err {
        ApiError::Validation { field_errors, .. } => {
            let fields = field_errors.expect("expected field errors");
            assert!(fields.contains_key("name"));
            assert!(fields.contains_key("email"));
            assert!(fields.contains_key("password"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn update_with_only_email_keeps_other_fields() -> Result<()> {
    let registry = common::seeded_registry();
    registry
        .accounts
        .update(
            2,
            &UpdateAccountRequest {
                email: Some("binh.tran@example.com".to_string()),
                ..Default::default()
            },
        )
        .await?;

    let account = registry.accounts.get_by_id(2).await?;
    assert_eq!(account.email, "binh.tran@example.com");
    assert_eq!(account.name, "Binh");
    assert_eq!(account.role, AccountRole::Staff);
    Ok(())
}

#[tokio::test]
async fn update_to_email_of_another_account_conflicts() {
    let registry = common::seeded_registry();
    let err = registry
        .accounts
        .update(
            2,
            &UpdateAccountRequest {
                email: Some("alice@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn update_enforces_admin_password_complexity() {
    let registry = common::seeded_registry();
    let err = registry
        .accounts
        .update(
            2,
            &UpdateAccountRequest {
                password: Some("weakpass".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn profile_update_allows_simpler_password_and_login_with_it() -> Result<()> {
    let registry = common::seeded_registry();
    registry
        .accounts
        .update_profile(
            2,
            &UpdateProfileRequest {
                password: Some("newpass".to_string()),
                ..Default::default()
            },
        )
        .await?;

    let token = registry
        .accounts
        .login(&LoginRequest {
            email: "binh@example.com".to_string(),
            password: "newpass".to_string(),
        })
        .await?;
    assert!(!token.is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_is_rejected_while_account_has_articles() {
    let registry = common::seeded_registry();
    let err = registry.accounts.delete(2).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn delete_removes_account_without_articles() -> Result<()> {
    let registry = common::seeded_registry();
    registry.accounts.delete(3).await?;
    let err = registry.accounts.get_by_id(3).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn paged_listing_filters_by_role() -> Result<()> {
    let registry = common::seeded_registry();
    let page = registry
        .accounts
        .get_paged(&AccountQuery {
            role: Some(AccountRole::Staff),
            ..Default::default()
        })
        .await?;
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].name, "Binh");
    assert_eq!(page.total_pages, 1);
    Ok(())
}

#[tokio::test]
async fn paged_listing_normalizes_out_of_range_paging() -> Result<()> {
    let registry = common::seeded_registry();
    let page = registry
        .accounts
        .get_paged(&AccountQuery {
            page: PageRequest {
                page_number: Some(-1),
                page_size: Some(500),
                ..Default::default()
            },
            ..Default::default()
        })
        .await?;
    assert_eq!(page.page_number, 1);
    assert_eq!(page.page_size, 50);
    Ok(())
}

#[tokio::test]
async fn lookup_orders_rows_by_name() -> Result<()> {
    let registry = common::seeded_registry();
    let rows = registry
        .accounts
        .lookup(&AccountLookupRequest::default())
        .await?;
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Alice", "Binh", "Chau"]);
    Ok(())
}
