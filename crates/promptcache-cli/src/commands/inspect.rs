//! `render` and `breakpoints`: build a request offline and show it

use crate::args::RequestArgs;
use crate::console;
use anyhow::Context;
use promptcache_core::config::load_settings;
use promptcache_core::{
    AnthropicEncoder, OutboundRequest, RequestBuilder, Settings, StaticAssets, Transcript, Turn,
};
use std::path::Path;
use std::sync::Arc;

/// Print the request headers to stderr and the encoded body to stdout
pub fn render(config: Option<&Path>, args: &RequestArgs) -> anyhow::Result<()> {
    let (request, settings) = build_request(config, args)?;
    for (name, value) in
        AnthropicEncoder::request_headers(&request, &settings.provider.api_version)
    {
        eprintln!("{}: {}", name, value);
    }
    let body = AnthropicEncoder::request_body(&request);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Print each annotated location and the count against the ceiling
pub fn breakpoints(config: Option<&Path>, args: &RequestArgs) -> anyhow::Result<()> {
    let (request, settings) = build_request(config, args)?;
    let max = settings.cache.max_breakpoints;
    let sites = request.breakpoint_sites();

    console::header("Cache breakpoints");
    for (index, site) in sites.iter().enumerate() {
        console::field(&format!("#{}", index + 1), &site.to_string());
    }
    console::field("ttl", args.options().ttl().as_wire_str());

    let summary = format!("{} of {} breakpoints used", sites.len(), max);
    if sites.len() < max {
        console::success(&summary);
    } else {
        console::warn(&summary);
    }
    Ok(())
}

/// Build the request described by `args`, returning it with the settings used
fn build_request(
    config: Option<&Path>,
    args: &RequestArgs,
) -> anyhow::Result<(OutboundRequest, Settings)> {
    let settings = load_settings(config).context("Failed to load settings")?;
    let assets = StaticAssets::load(&settings.assets).context("Failed to load static assets")?;
    let builder = RequestBuilder::new(Arc::new(assets), &settings.provider, settings.cache)?;

    let transcript = match &args.transcript {
        Some(path) => load_transcript(path)?,
        None => Transcript::new(),
    };

    let request = builder.build(&transcript, &args.text, &args.options())?;
    Ok((request, settings))
}

/// Read prior turns from a JSON array file
pub(crate) fn load_transcript(path: &Path) -> anyhow::Result<Transcript> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    let turns: Vec<Turn> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid transcript JSON in {}", path.display()))?;
    Ok(Transcript::from_turns(turns)?)
}
