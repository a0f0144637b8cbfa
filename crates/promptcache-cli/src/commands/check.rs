//! `check`: validate settings and assets without sending anything

use crate::console;
use anyhow::Context;
use promptcache_core::StaticAssets;
use promptcache_core::config::load_settings;
use std::path::Path;

pub fn check(config: Option<&Path>) -> anyhow::Result<()> {
    let settings = load_settings(config).context("Failed to load settings")?;

    console::header("promptcache configuration");
    console::field(
        "config file",
        &config.map_or_else(|| "(none)".to_string(), |p| p.display().to_string()),
    );
    console::field("model", &settings.provider.model);
    console::field(
        "api key",
        &settings
            .provider
            .masked_api_key()
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    console::field(
        "max breakpoints",
        &settings.cache.max_breakpoints.to_string(),
    );
    console::field(
        "request timeout",
        &format!("{}s", settings.session.request_timeout_secs),
    );

    let assets = StaticAssets::load(&settings.assets).context("Failed to load static assets")?;
    console::field(
        "document",
        if assets.document.is_some() { "loaded" } else { "(none)" },
    );
    console::field("tools", &assets.tools.len().to_string());

    settings.validate()?;
    console::success("Configuration is valid");
    Ok(())
}
