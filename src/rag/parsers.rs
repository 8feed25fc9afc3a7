//! Text extraction from uploaded documents and web pages.

use crate::error::{RagentError, Result};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Timeout for fetching a web page.
pub const URL_FETCH_TIMEOUT_SECS: u64 = 30;

const TEXT_EXTENSIONS: [&str; 6] = [".txt", ".csv", ".json", ".xml", ".yaml", ".yml"];

/// Extract plain text from raw bytes.
///
/// The content type is consulted first, then the filename extension. Unknown
/// formats fall back to lossy UTF-8 decoding.
pub fn parse_document(content: &[u8], filename: &str, content_type: Option<&str>) -> Result<String> {
    let ct = content_type.unwrap_or_default().to_lowercase();
    let name = filename.to_lowercase();

    if ct == "application/pdf" || name.ends_with(".pdf") {
        return parse_pdf(content);
    }

    if ct == "text/html" || name.ends_with(".html") || name.ends_with(".htm") {
        return HtmlExtractor::new().extract(&String::from_utf8_lossy(content));
    }

    if ct == "text/markdown"
        || ct == "text/x-markdown"
        || name.ends_with(".md")
        || name.ends_with(".markdown")
    {
        return Ok(parse_text(content));
    }

    if ct.starts_with("text/") || TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        return Ok(parse_text(content));
    }

    warn!(
        "Unknown content type '{}' for '{}', attempting text extraction",
        ct, filename
    );
    Ok(parse_text(content))
}

/// Decode as UTF-8, replacing invalid sequences.
pub fn parse_text(content: &[u8]) -> String {
    String::from_utf8_lossy(content).into_owned()
}

/// Extract text from a PDF; non-blank pages are separated by a blank line.
pub fn parse_pdf(content: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(content)
        .map_err(|e| RagentError::Parse(format!("Failed to extract PDF text: {}", e)))?;

    let pages: Vec<&str> = text
        .split('\u{c}')
        .filter(|page| !page.trim().is_empty())
        .collect();

    debug!("Extracted {} non-empty PDF pages", pages.len());
    Ok(pages.join("\n\n"))
}

/// Fetch a web page and return its visible text.
#[instrument(skip(client))]
pub async fn fetch_and_parse_url(client: &reqwest::Client, url: &str) -> Result<String> {
    let parsed = url::Url::parse(url)
        .map_err(|e| RagentError::InvalidInput(format!("Invalid URL '{}': {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(RagentError::InvalidInput(format!(
            "Unsupported URL scheme '{}'",
            parsed.scheme()
        )));
    }

    let response = client
        .get(parsed)
        .timeout(Duration::from_secs(URL_FETCH_TIMEOUT_SECS))
        .send()
        .await?
        .error_for_status()?;

    let html = response.text().await?;
    debug!("Fetched {} bytes from {}", html.len(), url);

    HtmlExtractor::new().extract(&html)
}

/// Tags whose whole subtree is page chrome rather than content.
const SKIPPED_TAGS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Converts HTML to readable text, one line per block.
///
/// Parsing and entity decoding are done by `htmd`, so headings and emphasis
/// come out as Markdown markup.
pub struct HtmlExtractor {
    converter: htmd::HtmlToMarkdown,
}

impl HtmlExtractor {
    pub fn new() -> Self {
        Self {
            converter: htmd::HtmlToMarkdown::builder()
                .skip_tags(SKIPPED_TAGS.to_vec())
                .build(),
        }
    }

    pub fn extract(&self, html: &str) -> Result<String> {
        let markdown = self
            .converter
            .convert(html)
            .map_err(|e| RagentError::Parse(format!("Failed to parse HTML: {}", e)))?;

        Ok(markdown
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}
