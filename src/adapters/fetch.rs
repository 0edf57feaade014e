//! Article fetching and HTML cleanup

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::debug;

use super::search::decode_entities;
use super::ContentFetcher;
use crate::config::{ArticleConfig, ServicesConfig};
use crate::error::{Error, FetchError, Result};

lazy_static! {
    /// Page chrome removed before text extraction (no backreferences in `regex`)
    static ref RE_CHROME: Vec<Regex> = ["script", "style", "nav", "footer", "aside", "header"]
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{0}\b[^>]*>.*?</{0}\s*>", tag)).unwrap())
        .collect();

    static ref RE_ARTICLE: Regex = Regex::new(r"(?is)<article\b[^>]*>(.*)</article\s*>").unwrap();
    static ref RE_MAIN: Regex = Regex::new(r"(?is)<main\b[^>]*>(.*)</main\s*>").unwrap();
    static ref RE_BODY: Regex = Regex::new(r"(?is)<body\b[^>]*>(.*)</body\s*>").unwrap();
    static ref RE_PARAGRAPH: Regex = Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").unwrap();
    static ref RE_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();

    // Textual cleanup rules, applied in order
    static ref RE_GALLERY_COUNTER: Regex = Regex::new(r"\d+ of \d+\|?").unwrap();
    static ref RE_READ_MORE: Regex = Regex::new(r"Read More.*?(of \d+\|?)?").unwrap();
    static ref RE_AP_PHOTO: Regex = Regex::new(r"\(AP Photo[^)]*\)").unwrap();
    static ref RE_BREAKING: Regex = Regex::new(r"(?i)THIS IS A BREAKING NEWS UPDATE\.?").unwrap();
    static ref RE_WIRE_CAPTION: Regex = Regex::new(r"(?i)Smoke raises? at .*?Saturday, Jan\.?").unwrap();
    static ref RE_SPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// reqwest-based fetcher with browser-like headers
#[derive(Debug, Clone)]
pub struct WebFetcher {
    client: reqwest::Client,
    max_chars: usize,
}

impl WebFetcher {
    pub fn from_config(services: &ServicesConfig, article: &ArticleConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .user_agent(services.user_agent.as_str())
            .default_headers(headers)
            .timeout(article.fetch_timeout())
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            max_chars: article.content_max_chars,
        })
    }
}

#[async_trait]
impl ContentFetcher for WebFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16()));
        }
        let html = response.text().await.map_err(transport_error)?;
        debug!(bytes = html.len(), url, "page fetched");
        Ok(truncate_chars(&clean_text(&extract_text(&html)), self.max_chars))
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// Visible article text: `<article>`, else `<main>`, else `<body>`, else paragraphs
pub fn extract_text(html: &str) -> String {
    let mut stripped = html.to_string();
    for re in RE_CHROME.iter() {
        stripped = re.replace_all(&stripped, " ").into_owned();
    }

    let region = [&*RE_ARTICLE, &*RE_MAIN, &*RE_BODY]
        .iter()
        .find_map(|re| re.captures(&stripped).map(|c| c[1].to_string()));

    let raw = match region {
        Some(region) => region,
        None => RE_PARAGRAPH
            .captures_iter(&stripped)
            .map(|c| c[1].to_string())
            .collect::<Vec<_>>()
            .join(" "),
    };

    let text = decode_entities(&RE_TAG.replace_all(&raw, " "));
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip gallery counters, captions and banners left in article text
pub fn clean_text(text: &str) -> String {
    let text = RE_GALLERY_COUNTER.replace_all(text, "");
    let text = RE_READ_MORE.replace_all(&text, "");
    let text = RE_AP_PHOTO.replace_all(&text, "");
    let text = RE_BREAKING.replace_all(&text, "");
    let text = RE_WIRE_CAPTION.replace_all(&text, "");
    RE_SPACE.replace_all(&text, " ").trim().to_string()
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_prefers_article() {
        let html = r#"<html><head><style>p{}</style></head><body>
            <nav>Home | World</nav>
            <article><h1>Title</h1><p>First &amp; second.</p><script>var x = 1;</script></article>
            <footer>Copyright</footer></body></html>"#;
        assert_eq!(extract_text(html), "Title First & second.");
    }

    #[test]
    fn test_extract_falls_back_to_paragraphs() {
        let html = "<div><p>One.</p><p>Two.</p></div>";
        assert_eq!(extract_text(html), "One. Two.");
    }

    #[test]
    fn test_extract_decodes_numeric_entities() {
        let html = "<p>The mayor&#8217;s office called it &#8220;final&#8221;.</p>";
        assert_eq!(extract_text(html), "The mayor\u{2019}s office called it \u{201C}final\u{201D}.");
    }

    #[test]
    fn test_clean_text_rules() {
        let raw = "THIS IS A BREAKING NEWS UPDATE. 1 of 5| Officials said (AP Photo/Jane Doe) the bridge reopened. Read More";
        assert_eq!(clean_text(raw), "Officials said the bridge reopened.");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
