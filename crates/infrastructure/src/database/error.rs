use diesel::result::{DatabaseErrorKind, Error as DieselError};
use domain::DomainError;
use thiserror::Error;

/// Error raised inside a blocking database closure, before it is translated
/// into a [`DomainError`] for the caller.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Diesel(#[from] DieselError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Domain(err) => err,
            StorageError::Diesel(err) => DomainError::repository(err),
        }
    }
}

pub(crate) fn is_unique_violation(err: &DieselError) -> bool {
    matches!(err, DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
}

pub(crate) fn is_foreign_key_violation(err: &DieselError) -> bool {
    matches!(err, DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _))
}
