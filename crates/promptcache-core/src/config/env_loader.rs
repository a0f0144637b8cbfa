//! Environment variable overrides

use crate::config::file_loader::load_from_file;
use crate::config::settings::Settings;
use crate::error::{PromptCacheError, PromptCacheResult};
use std::path::Path;
use std::str::FromStr;

/// Environment variables consulted for the API key, in priority order
pub const API_KEY_ENV_VARS: &[&str] = &["PROMPTCACHE_API_KEY", "ANTHROPIC_API_KEY"];

/// Load settings from an optional file, then apply process environment overrides
pub fn load_settings(path: Option<&Path>) -> PromptCacheResult<Settings> {
    let mut settings = match path {
        Some(path) => load_from_file(path)?,
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
    Ok(settings)
}

/// Apply overrides read through `lookup`
///
/// Environment wins over file values. Unparseable numeric values are
/// configuration errors rather than silently ignored.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> PromptCacheResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = API_KEY_ENV_VARS.iter().find_map(|&name| lookup(name)) {
        settings.provider.api_key = Some(key);
    }

    if let Some(model) = lookup("PROMPTCACHE_MODEL") {
        settings.provider.model = model;
    }

    if let Some(max_tokens) = parse_var(&lookup, "PROMPTCACHE_MAX_TOKENS")? {
        settings.provider.max_tokens = max_tokens;
    }

    if let Some(max_breakpoints) = parse_var(&lookup, "PROMPTCACHE_MAX_BREAKPOINTS")? {
        settings.cache.max_breakpoints = max_breakpoints;
    }

    if let Some(timeout) = parse_var(&lookup, "PROMPTCACHE_REQUEST_TIMEOUT_SECS")? {
        settings.session.request_timeout_secs = timeout;
    }

    Ok(())
}

fn parse_var<F, T>(lookup: &F, name: &str) -> PromptCacheResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PromptCacheError::config(format!("Invalid {} value: {}", name, raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_promptcache_key_wins_over_anthropic_key() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            env(&[
                ("ANTHROPIC_API_KEY", "sk-ant-fallback-000000"),
                ("PROMPTCACHE_API_KEY", "sk-ant-primary-111111"),
            ]),
        )
        .unwrap();
        assert_eq!(
            settings.provider.api_key.as_deref(),
            Some("sk-ant-primary-111111")
        );
    }

    #[test]
    fn test_numeric_overrides() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            env(&[
                ("PROMPTCACHE_MAX_TOKENS", "2048"),
                ("PROMPTCACHE_MAX_BREAKPOINTS", "2"),
                ("PROMPTCACHE_REQUEST_TIMEOUT_SECS", " 15 "),
                ("PROMPTCACHE_MODEL", "claude-opus-4-20250514"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.provider.max_tokens, 2048);
        assert_eq!(settings.cache.max_breakpoints, 2);
        assert_eq!(settings.session.request_timeout_secs, 15);
        assert_eq!(settings.provider.model, "claude-opus-4-20250514");
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let mut settings = Settings::default();
        let err = apply_env_overrides(&mut settings, env(&[("PROMPTCACHE_MAX_TOKENS", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("PROMPTCACHE_MAX_TOKENS"));
    }
}
