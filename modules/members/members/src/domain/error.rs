use members_sdk::MembersError;
use querystudy_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Member not found: {username}")]
    MemberNotFound { username: String },

    #[error("Team not found: {id}")]
    TeamNotFound { id: i64 },

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    #[must_use]
    pub fn member_not_found(username: impl Into<String>) -> Self {
        Self::MemberNotFound {
            username: username.into(),
        }
    }

    #[must_use]
    pub fn team_not_found(id: i64) -> Self {
        Self::TeamNotFound { id }
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<DbError> for DomainError {
    fn from(e: DbError) -> Self {
        Self::database(e.to_string())
    }
}

impl From<DomainError> for MembersError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::MemberNotFound { username } => Self::member_not_found(username),
            DomainError::TeamNotFound { id } => Self::TeamNotFound { id },
            DomainError::Validation { field, message } => Self::validation(field, message),
            DomainError::Database { .. } => Self::Internal,
        }
    }
}
