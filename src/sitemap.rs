//! XML sitemap generation.
//!
//! Static routes come first, each stamped with the generation date, followed
//! by one entry per active template:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url><loc>https://example.com/</loc><lastmod>2026-10-19</lastmod>...</url>
//!   <url><loc>https://example.com/templates/1</loc><lastmod>2026-03-01</lastmod>...</url>
//! </urlset>
//! ```
//!
//! Markup is built with [maud](https://maud.lambda.xyz/), so every `loc` is
//! escaped the same way the HTML generator escapes its text.

use crate::config::SitemapConfig;
use crate::store::{StoreError, TemplateStore};
use crate::types::TemplateListing;
use chrono::NaiveDate;
use maud::{PreEscaped, html};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Date part of a stored timestamp (`2026-03-01` or `2026-03-01 10:00:00`).
fn parse_updated_at(raw: &str) -> Option<NaiveDate> {
    let date = raw.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Build the ordered entry list: static routes, then templates.
pub fn sitemap_entries(
    config: &SitemapConfig,
    listings: &[TemplateListing],
    today: NaiveDate,
) -> Vec<SitemapEntry> {
    let statics = config.static_routes.iter().map(|route| {
        let home = route == "/";
        SitemapEntry {
            loc: format!("{}{}", config.site_url, route),
            lastmod: today,
            changefreq: if home { "daily" } else { "weekly" },
            priority: if home { "1.0" } else { "0.8" },
        }
    });

    let templates = listings.iter().map(|listing| SitemapEntry {
        loc: format!(
            "{}{}",
            config.site_url,
            config.template_route.replace("{id}", &listing.id.to_string())
        ),
        lastmod: listing
            .updated_at
            .as_deref()
            .and_then(parse_updated_at)
            .unwrap_or(today),
        changefreq: "monthly",
        priority: "0.6",
    });

    statics.chain(templates).collect()
}

/// Render entries as a sitemap document.
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let body = html! {
        (PreEscaped(XML_DECLARATION))
        urlset xmlns=(SITEMAP_NS) {
            @for entry in entries {
                url {
                    loc { (entry.loc) }
                    lastmod { (entry.lastmod.format("%Y-%m-%d").to_string()) }
                    changefreq { (entry.changefreq) }
                    priority { (entry.priority) }
                }
            }
        }
    };
    body.into_string()
}

/// Query active templates and render the full sitemap.
pub fn generate_sitemap(
    config: &SitemapConfig,
    store: &impl TemplateStore,
    today: NaiveDate,
) -> Result<String, StoreError> {
    let listings = store.active_listings()?;
    tracing::debug!(templates = listings.len(), "building sitemap");
    Ok(render_sitemap(&sitemap_entries(config, &listings, today)))
}
