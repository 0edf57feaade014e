//! DuckDuckGo HTML endpoint search

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use url::Url;

use super::{SearchHit, WebSearch};
use crate::config::ServicesConfig;
use crate::error::{Error, Result};

lazy_static! {
    static ref RE_RESULT_LINK: Regex = Regex::new(
        r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#
    ).unwrap();

    static ref RE_RESULT_SNIPPET: Regex = Regex::new(
        r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#
    ).unwrap();

    static ref RE_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();

    static ref RE_ENTITY: Regex = Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap();
}

/// Scrapes `html.duckduckgo.com/html/?q=...`
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn from_config(services: &ServicesConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(services.user_agent.as_str())
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Search(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: services.search_endpoint.clone(),
        })
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| Error::Search(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Search(format!("HTTP {}", response.status())));
        }
        let html = response.text().await.map_err(|e| Error::Search(e.to_string()))?;
        Ok(parse_results(&html, max_results))
    }
}

/// Extract organic results from a result page, ads skipped
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let snippets: Vec<String> = RE_RESULT_SNIPPET
        .captures_iter(html)
        .map(|c| plain_text(&c[1]))
        .collect();

    RE_RESULT_LINK
        .captures_iter(html)
        .enumerate()
        .filter_map(|(i, c)| {
            let url = resolve_link(&c[1])?;
            Some(SearchHit {
                title: plain_text(&c[2]),
                url,
                snippet: snippets.get(i).cloned().unwrap_or_default(),
            })
        })
        .take(max_results)
        .collect()
}

/// Unwrap the `/l/?uddg=` redirect; None for ad links
fn resolve_link(href: &str) -> Option<String> {
    let href = decode_entities(href);
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href
    };
    let parsed = Url::parse(&absolute).ok()?;

    if parsed.domain() == Some("duckduckgo.com") {
        if parsed.path().starts_with("/y.js") {
            return None;
        }
        return parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned());
    }
    Some(parsed.to_string())
}

fn plain_text(fragment: &str) -> String {
    decode_entities(&RE_TAG.replace_all(fragment, ""))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode numeric and common named HTML entities in one pass; unknown or
/// invalid entities are kept verbatim
pub(crate) fn decode_entities(s: &str) -> String {
    RE_ENTITY
        .replace_all(s, |c: &regex::Captures| {
            let name = &c[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(name)
            };
            decoded.map_or_else(|| c[0].to_string(), |ch| ch.to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "lt" => '<',
        "gt" => '>',
        "nbsp" => ' ',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        _ => return None,
    };
    Some(ch)
}
