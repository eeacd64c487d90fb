use serde::Deserialize;

use crate::error::SubmitRejection;

pub const MAX_COMMENT_CHARS: usize = 1000;
pub const MAX_NAME_CHARS: usize = 50;

/// POST body as sent by the comment form. Every field may be absent or null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub page: Option<String>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub turnstile_token: Option<String>,
}

impl SubmitPayload {
    pub fn from_json(body: &str) -> Result<Self, SubmitRejection> {
        serde_json::from_str(body).map_err(|_| SubmitRejection::InvalidBody)
    }
}

/// A comment that passed every local check and is ready to insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewComment {
    pub page: String,
    pub name: Option<String>,
    pub comment: String,
}

#[derive(Debug)]
pub struct ValidSubmission {
    pub comment: NewComment,
    pub turnstile_token: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Run the local checks in order, stopping at the first failure.
pub fn validate(payload: SubmitPayload) -> Result<ValidSubmission, SubmitRejection> {
    let comment = payload.comment.as_deref().map(str::trim).unwrap_or_default();
    if comment.is_empty() {
        return Err(SubmitRejection::CommentRequired);
    }

    let Some(page) = non_empty(payload.page) else {
        return Err(SubmitRejection::PageRequired);
    };

    if comment.chars().count() > MAX_COMMENT_CHARS {
        return Err(SubmitRejection::CommentTooLong);
    }

    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(SubmitRejection::NameTooLong);
    }

    let Some(turnstile_token) = non_empty(payload.turnstile_token) else {
        return Err(SubmitRejection::TokenRequired);
    };

    Ok(ValidSubmission {
        comment: NewComment {
            page,
            name: (!name.is_empty()).then(|| name.to_string()),
            comment: comment.to_string(),
        },
        turnstile_token,
    })
}
