//! Database-specific error types and conversions.

use spbu_core::error::SpbuError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {entity}: {key}")]
    Duplicate { entity: String, key: String },

    #[error("Password hash error: {0}")]
    Hash(String),
}

impl DbError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<DbError> for SpbuError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => SpbuError::NotFound { entity, id },
            DbError::Duplicate { entity, key } => SpbuError::AlreadyExists {
                entity: format!("{entity} {key}"),
            },
            other => SpbuError::Database(other.to_string()),
        }
    }
}
