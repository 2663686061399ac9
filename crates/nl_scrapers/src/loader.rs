use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use nl_core::{Config, Document, DocumentLoader, Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Elements whose text never counts as article content.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "svg", "template",
];

const BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "li", "blockquote", "pre", "td", "th", "figcaption",
];

/// Fetches pages over plain HTTP and keeps their readable text.
pub struct UrlLoader {
    client: Arc<Client>,
}

impl fmt::Debug for UrlLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlLoader")
            .field("client", &"<reqwest::Client>")
            .finish()
    }
}

impl UrlLoader {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl DocumentLoader for UrlLoader {
    async fn load(&self, url: &str) -> Result<Document> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Scraping(format!("{} returned {}", url, status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/html")
            .to_ascii_lowercase();
        let body = response.text().await?;
        debug!(url, content_type = %content_type, bytes = body.len(), "fetched document");

        let (title, content) = if content_type.contains("html") {
            extract_readable_text(&body)?
        } else if content_type.starts_with("text/plain") {
            (None, body.trim().to_string())
        } else {
            return Err(Error::Scraping(format!(
                "{} has unsupported content type {}",
                url, content_type
            )));
        };

        Ok(Document {
            url: url.to_string(),
            title,
            content,
        })
    }
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Scraping(format!("Invalid selector {:?}: {}", css, e)))
}

/// True when an ancestor of `element` below `root` is one of `tags`.
/// Wrappers above the content root never count.
fn enclosed_by(element: &ElementRef<'_>, root: &ElementRef<'_>, tags: &[&str]) -> bool {
    element
        .ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(|node| node.value().as_element().map(|el| el.name()))
        .any(|tag| tags.contains(&tag))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title plus the readable text of an HTML page, one block per line.
///
/// Content comes from `<article>`, else `<main>`, else `<body>`. Nested
/// blocks (a `<p>` inside an `<li>`) are read once, through the outer block.
pub fn extract_readable_text(html: &str) -> Result<(Option<String>, String)> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector("title")?)
        .next()
        .or_else(|| document.select(&selector("h1").ok()?).next())
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|title| !title.is_empty());

    let mut root = None;
    for css in ["article", "main", "body"] {
        if let Some(el) = document.select(&selector(css)?).next() {
            root = Some(el);
            break;
        }
    }
    let Some(root) = root else {
        return Ok((title, String::new()));
    };

    let blocks = selector(&BLOCK_TAGS.join(", "))?;
    let mut lines: Vec<String> = root
        .select(&blocks)
        .filter(|el| !enclosed_by(el, &root, SKIPPED_TAGS))
        .filter(|el| !enclosed_by(el, &root, BLOCK_TAGS))
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        // No block markup: fall back to every visible text node.
        let text = root
            .descendants()
            .filter(|node| {
                !node
                    .ancestors()
                    .take_while(|ancestor| ancestor.id() != root.id())
                    .filter_map(|node| node.value().as_element().map(|el| el.name()))
                    .any(|tag| SKIPPED_TAGS.contains(&tag))
            })
            .filter_map(|node| node.value().as_text().map(|text| text.to_string()))
            .collect::<Vec<_>>()
            .join(" ");
        let text = collapse_whitespace(&text);
        if !text.is_empty() {
            lines.push(text);
        }
    }

    Ok((title, lines.join("\n")))
}
