//! Runtime configuration, resolved once per request from the host's bindings.

pub const DEFAULT_SITEVERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Name of the D1 binding in `wrangler.toml` when `DATABASE_BINDING` is unset.
pub const DEFAULT_DATABASE_BINDING: &str = "DB";

/// Strip whitespace and one layer of matching quotes.
///
/// Dashboard-pasted secrets frequently arrive as `"value"`.
pub fn normalize_env_value(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(inner) = trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return inner.trim().to_string();
    }

    trimmed.to_string()
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    /// D1 binding that backs the comment store.
    pub database_binding: String,
    /// Turnstile secret. Absence is a configuration error, never a verification failure.
    pub turnstile_secret: Option<String>,
    pub siteverify_url: String,
    /// Bearer token for the admin routes.
    pub migrations_token: Option<String>,
    /// Include underlying error text in 500 envelopes.
    pub expose_error_details: bool,
}

impl Config {
    /// Build a config from any key lookup (Worker `Env`, a map in tests, ...).
    ///
    /// Values are normalised and empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| normalize_env_value(&v))
                .filter(|v| !v.is_empty())
        };

        Config {
            database_binding: get("DATABASE_BINDING")
                .unwrap_or_else(|| DEFAULT_DATABASE_BINDING.to_string()),
            turnstile_secret: get("TURNSTILE_SECRET_KEY"),
            siteverify_url: get("TURNSTILE_VERIFY_URL")
                .unwrap_or_else(|| DEFAULT_SITEVERIFY_URL.to_string()),
            migrations_token: get("MIGRATIONS_TOKEN"),
            expose_error_details: ["APP_ENV", "NODE_ENV"]
                .into_iter()
                .filter_map(get)
                .any(|env| env.eq_ignore_ascii_case("development")),
        }
    }
}
