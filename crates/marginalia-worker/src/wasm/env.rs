use worker::Env;

use crate::config::{normalize_env_value, Config};

pub fn env_string(env: &Env, key: &str) -> Option<String> {
    env.secret(key)
        .ok()
        .map(|v| v.to_string())
        .or_else(|| env.var(key).ok().map(|v| v.to_string()))
        .map(|v| normalize_env_value(&v))
        .filter(|s| !s.is_empty())
}

/// Resolve the whole config from the Worker's bindings (vars and secrets).
pub fn load_config(env: &Env) -> Config {
    Config::from_lookup(|key| env_string(env, key))
}
