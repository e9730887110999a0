pub mod account_service;
pub mod article_service;
pub mod category_service;
pub mod tag_service;

pub use account_service::AccountService;
pub use article_service::ArticleService;
pub use category_service::CategoryService;
pub use tag_service::TagService;

/// Minimal structural email check shared by the account validators.
pub(crate) fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        _ => false,
    }
}

/// Treats blank strings the same as absent values when merging patches.
pub(crate) fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_check_accepts_plain_addresses() {
        assert!(is_valid_email("staff@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn trimmed_drops_blank_values() {
        assert_eq!(trimmed(&Some("  x ".into())), Some("x".to_string()));
        assert_eq!(trimmed(&Some("   ".into())), None);
        assert_eq!(trimmed(&None), None);
    }
}
