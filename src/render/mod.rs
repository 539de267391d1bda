mod embed;

pub use embed::Embedder;
#[cfg(test)]
pub(crate) use embed::test_provider;

use pulldown_cmark::{Event, Options, Parser, html};

use crate::config::Config;

/// Turns a raw message body into the HTML that gets stored and broadcast.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    markdown: bool,
    embedder: Option<Embedder>,
}

impl Renderer {
    pub fn new(markdown: bool, embedder: Option<Embedder>) -> Self {
        Self { markdown, embedder }
    }

    /// Escapes the body and nothing else.
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let embedder = config
            .embedly_key
            .clone()
            .map(|key| Embedder::embedly(key, config.embed_timeout));
        Self::new(config.markdown, embedder)
    }

    pub async fn render(&self, raw: &str) -> String {
        let body = if self.markdown {
            markdown_to_html(raw)
        } else {
            escape(raw)
        };

        match &self.embedder {
            Some(embedder) => embedder.embed_links(&body).await,
            None => body,
        }
    }
}

pub fn markdown_to_html(raw: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_SMART_PUNCTUATION;

    // nobody gets to inject markup, raw html is shown as text
    let parser = Parser::new_ext(raw, options).map(|event| match event {
        Event::Html(text) | Event::InlineHtml(text) => Event::Text(text),
        _ => event,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output.truncate(html_output.trim_end().len());
    html_output
}

fn escape(raw: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, std::iter::once(Event::Text(raw.into())));
    out
}
