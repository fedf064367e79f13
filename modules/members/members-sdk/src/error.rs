use thiserror::Error;

/// Errors surfaced by the members module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MembersError {
    #[error("Member not found: {username}")]
    MemberNotFound { username: String },

    #[error("Team not found: {id}")]
    TeamNotFound { id: i64 },

    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Internal error")]
    Internal,
}

impl MembersError {
    #[must_use]
    pub fn member_not_found(username: impl Into<String>) -> Self {
        Self::MemberNotFound {
            username: username.into(),
        }
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
