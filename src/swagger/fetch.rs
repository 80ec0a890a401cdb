use anyhow::{bail, Context, Result};
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

use crate::swagger::parse::parse_spec_text;
use crate::types::{ApiSpec, BackgroundEvent};

/// Spawns a background task that loads and parses the spec at `source`.
/// Progress and the result are reported over `tx`.
pub fn load_spec_background(source: String, tx: UnboundedSender<BackgroundEvent>) {
    tokio::spawn(async move {
        let event = match load_spec(&source, &tx).await {
            Ok(spec) => {
                tracing::info!(
                    source = %source,
                    endpoints = spec.endpoints.len(),
                    schemas = spec.schemas.len(),
                    "spec loaded"
                );
                BackgroundEvent::SpecLoaded(spec)
            }
            Err(e) => {
                tracing::warn!(source = %source, error = %format!("{e:#}"), "spec load failed");
                BackgroundEvent::SpecFailed(format!("{e:#}"))
            }
        };
        // Receiver gone means the app is shutting down
        let _ = tx.send(event);
    });
}

async fn load_spec(source: &str, tx: &UnboundedSender<BackgroundEvent>) -> Result<ApiSpec> {
    let (text, location) = fetch_source(source).await?;

    let text = if looks_like_html(&text) {
        let Some(link) = location.as_ref().and_then(|page| discover_spec_link(&text, page)) else {
            bail!("{source} is an HTML page without a recognisable spec link");
        };
        tracing::debug!(%link, "following spec link from documentation page");
        fetch_source(link.as_str()).await?.0
    } else {
        text
    };

    let _ = tx.send(BackgroundEvent::Parsing);
    parse_spec_text(&text).with_context(|| format!("Parse error in {source}"))
}

/// Reads a local file or downloads an http(s) URL. The URL is returned for remote sources.
async fn fetch_source(source: &str) -> Result<(String, Option<Url>)> {
    if is_remote(source) {
        let url = Url::parse(source).with_context(|| format!("Invalid URL: {source}"))?;
        let response = reqwest::get(url.clone())
            .await
            .with_context(|| format!("Network error fetching {source}"))?
            .error_for_status()
            .with_context(|| format!("Server rejected {source}"))?;
        let text = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok((text, Some(url)))
    } else {
        let text = tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read {source}"))?;
        Ok((text, None))
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn looks_like_html(text: &str) -> bool {
    let head: String = text.trim_start().chars().take(32).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Finds the spec document a Swagger UI style page points at: the first quoted
/// string ending in `.json`, `.yaml` or `.yml`, resolved against the page URL.
pub fn discover_spec_link(html: &str, page: &Url) -> Option<Url> {
    html.split(['"', '\''])
        .skip(1)
        .step_by(2)
        .map(str::trim)
        .find(|candidate| {
            !candidate.contains(char::is_whitespace)
                && [".json", ".yaml", ".yml"]
                    .iter()
                    .any(|ext| candidate.to_ascii_lowercase().ends_with(ext))
        })
        .and_then(|candidate| page.join(candidate).ok())
}
