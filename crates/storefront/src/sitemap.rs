//! XML sitemap generation.
//!
//! Static pages plus one entry per product. Products are paged out of the
//! backend; if the backend fails part way, the sitemap keeps what it has.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::future::Future;

use chrono::{DateTime, Utc};
use souk_core::models::{Page, Product};

use crate::backend::{BackendClient, BackendError, ProductQuery};

/// Products requested per backend page.
pub const PAGE_SIZE: u32 = 100;

/// Hard cap on backend pages fetched for one sitemap.
pub const MAX_PAGES: u32 = 50;

/// Static pages with change frequency and priority.
const STATIC_PAGES: &[(&str, &str, &str)] = &[
    ("/", "daily", "1.0"),
    ("/products", "daily", "0.9"),
    ("/stores", "weekly", "0.8"),
    ("/categories", "weekly", "0.8"),
    ("/about", "monthly", "0.5"),
    ("/contact", "monthly", "0.5"),
    ("/faq", "monthly", "0.5"),
    ("/auth/login", "yearly", "0.3"),
    ("/auth/signup", "yearly", "0.3"),
    ("/sell", "monthly", "0.6"),
];

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Entries for the static pages under `base_url`.
#[must_use]
pub fn static_entries(base_url: &str) -> Vec<SitemapEntry> {
    STATIC_PAGES
        .iter()
        .map(|&(path, changefreq, priority)| SitemapEntry {
            loc: format!("{base_url}{path}"),
            lastmod: None,
            changefreq,
            priority,
        })
        .collect()
}

/// Entry for a product page, `/product/{slug or id}`.
#[must_use]
pub fn product_entry(base_url: &str, product: &Product) -> SitemapEntry {
    SitemapEntry {
        loc: format!(
            "{base_url}/product/{}",
            urlencoding::encode(product.handle())
        ),
        lastmod: product.last_modified(),
        changefreq: "weekly",
        priority: "0.7",
    }
}

/// Escape text for XML element content.
#[must_use]
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Render entries as a sitemap document.
#[must_use]
pub fn render(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for entry in entries {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&entry.loc));
        if let Some(lastmod) = entry.lastmod {
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", lastmod.format("%Y-%m-%d"));
        }
        let _ = writeln!(xml, "    <changefreq>{}</changefreq>", entry.changefreq);
        let _ = writeln!(xml, "    <priority>{}</priority>", entry.priority);
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Page through products with `fetch` (1-based page numbers).
///
/// Stops at an empty or short page, at the page count the backend reports,
/// or after [`MAX_PAGES`]. A failed fetch ends the walk with what was
/// collected so far.
pub async fn collect_products<F, Fut>(mut fetch: F) -> Vec<Product>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<Product>, BackendError>>,
{
    let mut products = Vec::new();

    for page in 1..=MAX_PAGES {
        let batch = match fetch(page).await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(error = %e, page, "Sitemap product fetch failed, serving partial sitemap");
                break;
            }
        };

        let more = batch.has_more(page, PAGE_SIZE as usize);
        products.extend(batch.data);
        if !more {
            break;
        }
    }

    products
}

/// Build the full sitemap for `base_url` from the backend catalogue.
pub async fn build(backend: &BackendClient, base_url: &str) -> String {
    let products = collect_products(|page| {
        let query = ProductQuery::page(page, PAGE_SIZE);
        async move { backend.products(&query).await }
    })
    .await;

    let mut entries = static_entries(base_url);
    entries.extend(products.iter().map(|p| product_entry(base_url, p)));

    tracing::info!(products = products.len(), urls = entries.len(), "Sitemap generated");
    render(&entries)
}
