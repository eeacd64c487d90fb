use thiserror::Error;

/// Caller-facing reasons a submission is turned away with a 400.
///
/// Variant order matches the order the checks run in.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SubmitRejection {
    #[error("Invalid JSON body")]
    InvalidBody,
    #[error("Comment is required")]
    CommentRequired,
    #[error("Page identifier is required")]
    PageRequired,
    #[error("Comment exceeds maximum length of 1000 characters")]
    CommentTooLong,
    #[error("Name exceeds maximum length of 50 characters")]
    NameTooLong,
    #[error("Human verification required")]
    TokenRequired,
    #[error("Human verification failed. Please try again.")]
    VerificationFailed,
}

#[derive(Debug, Error)]
pub enum CommentError {
    #[error(transparent)]
    Rejected(#[from] SubmitRejection),

    /// A required setting is missing; nothing was sent anywhere.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("verification transport failed: {0}")]
    Transport(String),

    #[error("database error: {0}")]
    Store(#[from] sea_orm::DbErr),
}

impl CommentError {
    pub fn status(&self) -> u16 {
        match self {
            CommentError::Rejected(_) => 400,
            CommentError::NotConfigured(_) | CommentError::Transport(_) | CommentError::Store(_) => 500,
        }
    }
}
