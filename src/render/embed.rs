use std::{ops::Range, sync::LazyLock, time::Duration};

use regex::Regex;
use serde_json::Value;

const EMBEDLY_ENDPOINT: &str = "http://api.embed.ly/1/oembed";
const MAX_WIDTH: &str = "800";

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("link pattern compiles"));

/// Swaps bare links in rendered bodies for oEmbed snippets.
#[derive(Debug, Clone)]
pub struct Embedder {
    client: reqwest::Client,
    endpoint: String,
    key: String,
    timeout: Duration,
}

impl Embedder {
    /// Each lookup gives up after `timeout` and the link is kept as is.
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            key: key.into(),
            timeout,
        }
    }

    pub fn embedly(key: String, timeout: Duration) -> Self {
        Self::new(EMBEDLY_ENDPOINT, key, timeout)
    }

    /// Links the provider knows nothing about, or any failed lookup, stay as they are.
    pub async fn embed_links(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut last = 0;
        for link in bare_links(html) {
            out.push_str(&html[last..link.start]);
            let url = &html[link.clone()];
            match self.lookup(&unescape_link(url)).await {
                Ok(Some(embed)) => out.push_str(&embed),
                Ok(None) => out.push_str(url),
                Err(e) => {
                    tracing::warn!(url, error = %e, "embed lookup failed");
                    out.push_str(url);
                }
            }
            last = link.end;
        }
        out.push_str(&html[last..]);
        out
    }

    async fn lookup(&self, url: &str) -> reqwest::Result<Option<String>> {
        let body: Value = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .query(&[("key", self.key.as_str()), ("url", url), ("maxwidth", MAX_WIDTH)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body
            .get("html")
            .and_then(Value::as_str)
            .map(|html| format!(r#"<div style="width: {MAX_WIDTH}px;">{html}</div>"#)))
    }
}

/// Links sitting in text, not inside a tag attribute such as `href="..."`.
fn bare_links(html: &str) -> Vec<Range<usize>> {
    LINK.find_iter(html)
        .filter(|m| {
            html[..m.start()]
                .chars()
                .next_back()
                .is_none_or(|c| c.is_whitespace() || c == '>')
        })
        .map(|m| m.range())
        .collect()
}

/// Links come out of rendered HTML, where `&` in a query string reads `&amp;`.
fn unescape_link(url: &str) -> String {
    url.replace("&amp;", "&")
}

/// A local oEmbed provider that answers every lookup after `delay` with the
/// looked-up url wrapped in `<i>`. Returns its endpoint.
#[cfg(test)]
pub(crate) async fn test_provider(delay: Duration) -> String {
    use std::collections::HashMap;

    use axum::{Json, Router, extract::Query, routing::get};

    let provider = Router::new().route(
        "/oembed",
        get(move |Query(query): Query<HashMap<String, String>>| async move {
            tokio::time::sleep(delay).await;
            let url = query.get("url").cloned().unwrap_or_default();
            Json(serde_json::json!({ "type": "rich", "html": format!("<i>{url}</i>") }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, provider).await.unwrap() });
    format!("http://{addr}/oembed")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn links(html: &str) -> Vec<&str> {
        bare_links(html).into_iter().map(|r| &html[r]).collect()
    }

    #[test]
    fn finds_links_in_text() {
        assert_eq!(
            links("<p>look https://example.com/a?b=1 and http://x.org</p>"),
            ["https://example.com/a?b=1", "http://x.org"]
        );
        assert_eq!(links("https://start.io"), ["https://start.io"]);
    }

    #[test]
    fn skips_attributes() {
        let html = r#"<a href="https://example.com">https://example.com</a>"#;
        assert_eq!(bare_links(html).len(), 1);
        assert_eq!(links(html), ["https://example.com"]);
        assert!(links("nohttps://nope").is_empty());
    }

    #[tokio::test]
    async fn unreachable_provider_leaves_links() {
        let embedder = Embedder::new("http://127.0.0.1:9/oembed", "key", TIMEOUT);
        let html = "<p>see https://example.com</p>";
        assert_eq!(embedder.embed_links(html).await, html);
    }

    #[tokio::test]
    async fn silent_provider_times_out() {
        // accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let embedder = Embedder::new(format!("http://{addr}/oembed"), "key", TIMEOUT);
        let html = "<p>see https://example.com</p>";
        let embedded = tokio::time::timeout(Duration::from_secs(5), embedder.embed_links(html))
            .await
            .expect("lookup gives up on its own");
        assert_eq!(embedded, html);
    }

    #[tokio::test]
    async fn swaps_links_for_embeds() {
        let embedder = Embedder::new(test_provider(Duration::ZERO).await, "key", TIMEOUT);
        assert_eq!(
            embedder.embed_links("<p>see https://example.com/?a=1&amp;b=2</p>").await,
            r#"<p>see <div style="width: 800px;"><i>https://example.com/?a=1&b=2</i></div></p>"#
        );
    }

    #[test]
    fn unescapes_query_strings() {
        assert_eq!(unescape_link("http://x.org/?a=1&amp;b=2&amp;c"), "http://x.org/?a=1&b=2&c");
        assert_eq!(unescape_link("http://x.org/plain"), "http://x.org/plain");
    }

    #[tokio::test]
    async fn no_links_no_lookups() {
        let embedder = Embedder::new("http://127.0.0.1:9/oembed", "key", TIMEOUT);
        assert_eq!(embedder.embed_links("<p>plain</p>").await, "<p>plain</p>");
    }
}
