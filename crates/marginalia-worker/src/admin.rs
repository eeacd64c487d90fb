//! Authorization and parameters for the operator routes (migrations, db ping).

use subtle::ConstantTimeEq;

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    let (scheme, rest) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = rest.trim();
    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

#[derive(Debug, PartialEq, Eq)]
pub enum AdminAuth {
    Authorized,
    /// `MIGRATIONS_TOKEN` is unset, so admin routes are closed.
    Disabled,
    MissingToken,
    InvalidToken,
}

impl AdminAuth {
    pub fn check(required: Option<&str>, presented: Option<&str>) -> Self {
        let Some(required) = required else {
            return AdminAuth::Disabled;
        };
        let Some(presented) = presented else {
            return AdminAuth::MissingToken;
        };

        if bool::from(presented.as_bytes().ct_eq(required.as_bytes())) {
            AdminAuth::Authorized
        } else {
            AdminAuth::InvalidToken
        }
    }

    /// Status, code and message for a refusal; `None` when authorized.
    pub fn refusal(&self) -> Option<(u16, &'static str, &'static str)> {
        match self {
            AdminAuth::Authorized => None,
            AdminAuth::Disabled => Some((503, "admin_disabled", "MIGRATIONS_TOKEN is not configured")),
            AdminAuth::MissingToken => Some((401, "missing_token", "Missing Authorization Bearer token")),
            AdminAuth::InvalidToken => Some((401, "unauthorized", "Invalid migrations token")),
        }
    }
}

/// Number of migrations to apply in one request (`steps` or `limit`, default 1).
///
/// Each statement is a subrequest on Workers, so large batches are split across calls.
pub fn migration_steps<'a, I>(query: I) -> u32
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    query
        .into_iter()
        .find(|(k, _)| *k == "steps" || *k == "limit")
        .and_then(|(_, v)| v.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}
