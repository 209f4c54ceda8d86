use crate::http_client::build_http_client;
use crate::models::{CrawlResult, Heading, PageImage, PageLink};
use crate::url_validator::UrlValidator;
use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Extraction caps. Keep the crawl result small enough to feed an LLM
/// prompt without truncation surprises downstream.
const MAX_PARAGRAPHS: usize = 10;
const MIN_PARAGRAPH_CHARS: usize = 30;
const MAX_LINKS: usize = 20;
const MAX_CTAS: usize = 10;
const MAX_IMAGES: usize = 15;

// Cached selectors to avoid repeated parsing and eliminate unwrap() calls
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
static META_DESC_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='description']").expect("meta description selector should be valid")
});
static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3").expect("heading selector should be valid"));
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("paragraph selector should be valid"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector should be valid"));
static CTA_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("button, [role='button'], input[type='submit'], a.btn, a.button, a.cta")
        .expect("CTA selector should be valid")
});
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src]").expect("img[src] selector should be valid"));

/// Single-page crawler producing the structured signals the audit
/// agents consume. Validates the target against SSRF before any fetch.
pub struct Crawler {
    client: reqwest::Client,
    validator: UrlValidator,
}

impl Crawler {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Self::with_validator(timeout_secs, UrlValidator::new())
    }

    pub fn with_validator(timeout_secs: u64, validator: UrlValidator) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            validator,
        })
    }

    /// Fetch one page and extract its signals.
    ///
    /// Fails if URL validation rejects the target or the HTTP fetch
    /// fails; missing page elements are not errors, their absence is
    /// itself a signal for the SEO/UX agents.
    pub async fn crawl(&self, url: &str) -> Result<CrawlResult> {
        let validation = self.validator.validate(url).await;
        if !validation.valid {
            let reason = validation
                .error
                .unwrap_or_else(|| "URL validation failed".to_string());
            return Err(anyhow!("refusing to crawl {}: {}", url, reason));
        }

        let fetch_url = validation
            .resolved_url
            .unwrap_or_else(|| url.to_string());

        tracing::info!(url = %fetch_url, "fetching page");

        let response = self
            .client
            .get(&fetch_url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {}", fetch_url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("fetch of {} returned HTTP {}", fetch_url, status));
        }

        let html_content = response
            .text()
            .await
            .with_context(|| format!("failed to read body of {}", fetch_url))?;

        Ok(Self::extract(&fetch_url, &html_content))
    }

    /// Pure extraction over already-fetched HTML. Split out so tests
    /// can run it against fixtures without a server.
    pub fn extract(url: &str, html_content: &str) -> CrawlResult {
        let document = Html::parse_document(html_content);

        let title = Self::extract_title(&document);
        let meta_description = Self::extract_meta_description(&document);
        let headings = Self::extract_headings(&document);
        let paragraphs = Self::extract_paragraphs(&document);
        let links = Self::extract_links(&document);
        let ctas = Self::extract_ctas(&document);
        let images = Self::extract_images(&document);

        let summary = Self::build_summary(
            &title,
            &meta_description,
            &headings,
            &paragraphs,
            &ctas,
            &links,
            &images,
        );

        CrawlResult {
            url: url.to_string(),
            title,
            meta_description,
            headings,
            paragraphs,
            links,
            ctas,
            images,
            summary,
        }
    }

    fn extract_title(document: &Html) -> Option<String> {
        document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn extract_meta_description(document: &Html) -> Option<String> {
        document
            .select(&META_DESC_SELECTOR)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn extract_headings(document: &Html) -> Vec<Heading> {
        document
            .select(&HEADING_SELECTOR)
            .filter_map(|el| {
                let level = match el.value().name() {
                    "h1" => 1,
                    "h2" => 2,
                    "h3" => 3,
                    _ => return None,
                };
                let text = el.text().collect::<String>().trim().to_string();
                if text.is_empty() {
                    None
                } else {
                    Some(Heading { level, text })
                }
            })
            .collect()
    }

    fn extract_paragraphs(document: &Html) -> Vec<String> {
        document
            .select(&PARAGRAPH_SELECTOR)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|p| p.len() > MIN_PARAGRAPH_CHARS)
            .take(MAX_PARAGRAPHS)
            .collect()
    }

    fn extract_links(document: &Html) -> Vec<PageLink> {
        document
            .select(&ANCHOR_SELECTOR)
            .filter_map(|el| {
                let href = el.value().attr("href")?.trim().to_string();
                if href.is_empty() {
                    return None;
                }
                let text = el.text().collect::<String>().trim().to_string();
                Some(PageLink { text, href })
            })
            .take(MAX_LINKS)
            .collect()
    }

    fn extract_ctas(document: &Html) -> Vec<String> {
        let mut ctas = Vec::new();
        for el in document.select(&CTA_SELECTOR) {
            // Submit inputs carry their label in the value attribute
            let text = if el.value().name() == "input" {
                el.value().attr("value").unwrap_or("").trim().to_string()
            } else {
                el.text().collect::<String>().trim().to_string()
            };
            if !text.is_empty() && !ctas.contains(&text) {
                ctas.push(text);
            }
            if ctas.len() >= MAX_CTAS {
                break;
            }
        }
        ctas
    }

    fn extract_images(document: &Html) -> Vec<PageImage> {
        document
            .select(&IMG_SELECTOR)
            .filter_map(|el| {
                let src = el.value().attr("src")?.to_string();
                let alt = el
                    .value()
                    .attr("alt")
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());
                Some(PageImage { alt, src })
            })
            .take(MAX_IMAGES)
            .collect()
    }

    /// Builds the newline-joined text summary consumed as LLM context
    /// by downstream agents. Missing elements are omitted, not
    /// placeholder-filled.
    fn build_summary(
        title: &Option<String>,
        meta_description: &Option<String>,
        headings: &[Heading],
        paragraphs: &[String],
        ctas: &[String],
        links: &[PageLink],
        images: &[PageImage],
    ) -> String {
        let mut lines = Vec::new();

        if let Some(title) = title {
            lines.push(format!("Titre: {}", title));
        }
        if let Some(desc) = meta_description {
            lines.push(format!("Description: {}", desc));
        }

        if !headings.is_empty() {
            lines.push("Sections:".to_string());
            for h in headings {
                lines.push(format!("  [h{}] {}", h.level, h.text));
            }
        }

        for p in paragraphs.iter().take(5) {
            let truncated: String = p.chars().take(200).collect();
            lines.push(truncated);
        }

        if !ctas.is_empty() {
            lines.push(format!("Boutons/CTA: {}", ctas.join(", ")));
        }

        if !links.is_empty() {
            let link_texts: Vec<&str> = links
                .iter()
                .take(10)
                .map(|l| l.text.as_str())
                .filter(|t| !t.is_empty())
                .collect();
            if !link_texts.is_empty() {
                lines.push(format!("Liens: {}", link_texts.join(", ")));
            }
        }

        let alts: Vec<&str> = images
            .iter()
            .filter_map(|img| img.alt.as_deref())
            .take(5)
            .collect();
        if !alts.is_empty() {
            lines.push(format!("Images: {}", alts.join(", ")));
        }

        lines.join("\n")
    }
}
