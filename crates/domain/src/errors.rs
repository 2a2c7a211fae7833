use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Student not found with id: {0}")]
    StudentNotFound(i64),

    #[error("Course not found with id: {0}")]
    CourseNotFound(i64),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    /// Storage failed for a reason outside the domain's constraints; carries
    /// the underlying cause.
    #[error("Persistence failed: {0}")]
    RepositoryError(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn repository(cause: impl ToString) -> Self {
        Self::RepositoryError(cause.to_string())
    }
}
