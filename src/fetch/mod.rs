mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, LINK};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::debug;

/// Upper bound on pages followed for a single listing.
pub const MAX_PAGES: usize = 500;

async fn send<C: HttpClient>(client: &C, url: Url) -> Result<reqwest::Response> {
    let mut req = reqwest::Request::new(Method::GET, url.clone());
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));

    client
        .execute(req)
        .await
        .with_context(|| format!("request to {url} failed"))
}

async fn error_for_status(resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    let url = resp.url().clone();
    let body = resp.text().await.unwrap_or_default();
    anyhow!("{url} returned status {status}: {body}")
}

/// Fetches a single JSON document. A `404` is reported as `Ok(None)`.
pub async fn get_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    url: Url,
) -> Result<Option<T>> {
    let resp = send(client, url).await?;

    if resp.status() == StatusCode::NOT_FOUND {
        debug!(url = %resp.url(), "Resource not found");
        return Ok(None);
    }
    if !resp.status().is_success() {
        return Err(error_for_status(resp).await);
    }

    let url = resp.url().clone();
    let value = resp
        .json()
        .await
        .with_context(|| format!("failed to decode response from {url}"))?;
    Ok(Some(value))
}

/// Fetches every page of a JSON array endpoint, following `Link: rel="next"`.
///
/// Next links must stay on the origin of `url`, since the client may attach
/// credentials to every request. A link that revisits a page, or a listing
/// longer than [`MAX_PAGES`], is an error.
pub async fn get_paginated<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    url: Url,
) -> Result<Vec<T>> {
    let origin = url.origin();
    let mut visited: HashSet<Url> = HashSet::new();
    let mut items = Vec::new();
    let mut next = Some(url);

    while let Some(url) = next.take() {
        if visited.len() >= MAX_PAGES {
            bail!("pagination stopped after {MAX_PAGES} pages at {url}");
        }
        if !visited.insert(url.clone()) {
            bail!("pagination link revisits {url}");
        }

        let resp = send(client, url).await?;
        if !resp.status().is_success() {
            return Err(error_for_status(resp).await);
        }

        next = next_link(resp.headers())
            .map(|link| Url::parse(&link))
            .transpose()
            .context("malformed pagination link")?;
        if let Some(link) = &next {
            if link.origin() != origin {
                bail!(
                    "pagination link {link} leaves {}",
                    origin.ascii_serialization()
                );
            }
        }

        let url = resp.url().clone();
        let page: Vec<T> = resp
            .json()
            .await
            .with_context(|| format!("failed to decode page from {url}"))?;

        debug!(page = visited.len(), items = page.len(), "Page received");
        items.extend(page);
    }

    Ok(items)
}

/// Extracts the `rel="next"` target from a `Link` header, if any.
///
/// `<https://x/api/v1/courses/1/enrollments?page=2>; rel="next", <...>; rel="last"`
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(|entry| {
            let mut parts = entry.split(';');
            let target = parts.next()?.trim();
            let is_next = parts.any(|param| {
                let param = param.trim().replace(' ', "");
                param == "rel=\"next\"" || param == "rel=next"
            });

            if !is_next {
                return None;
            }

            target
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .map(str::to_string)
        })
}
