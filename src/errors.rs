//! Centralized error handling.
//!
//! Store failures are wrapped, not translated: the `sea-orm` error is kept
//! as the source of [`AppError::Database`].

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable error code for logs and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound.code(), "NOT_FOUND");
        assert_eq!(AppError::validation("bad").code(), "VALIDATION_ERROR");
        assert_eq!(AppError::internal("boom").code(), "INTERNAL_ERROR");
        assert_eq!(
            AppError::from(DbErr::Custom("x".into())).code(),
            "DATABASE_ERROR"
        );
    }

    #[test]
    fn test_db_error_keeps_source_message() {
        let err = AppError::from(DbErr::Custom("constraint failed".into()));
        assert!(err.to_string().contains("constraint failed"));
    }

    #[test]
    fn test_ok_or_not_found() {
        assert_eq!(Some(3).ok_or_not_found().unwrap(), 3);
        assert!(matches!(
            None::<i32>.ok_or_not_found(),
            Err(AppError::NotFound)
        ));
    }
}
