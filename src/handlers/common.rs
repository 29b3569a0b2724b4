use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaginationParams {
    #[param(default = 50, minimum = 1, maximum = 100)]
    pub limit: Option<i64>,
    #[param(default = 0, minimum = 0)]
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// (limit, offset) clamped to the accepted ranges
    pub fn resolve(&self) -> (u64, u64) {
        let limit = self.limit.unwrap_or(50).clamp(1, 100) as u64;
        let offset = self.offset.unwrap_or(0).max(0) as u64;
        (limit, offset)
    }
}

/// Trim a required text field, rejecting blank or overlong values
pub fn validate_required(value: &str, field: &str, max_len: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_clamping() {
        let params = PaginationParams {
            limit: None,
            offset: None,
        };
        assert_eq!(params.resolve(), (50, 0));

        let params = PaginationParams {
            limit: Some(1000),
            offset: Some(-5),
        };
        assert_eq!(params.resolve(), (100, 0));
    }

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("  beach ", "Label name", 10).unwrap(), "beach");
        assert!(matches!(
            validate_required("   ", "Label name", 10),
            Err(AppError::Validation(msg)) if msg == "Label name is required"
        ));
        assert!(validate_required("abcdefghijk", "Label name", 10).is_err());
    }
}
