//! HTML pages and sitemap rendered with Tera.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera};

use crate::assets::AssetLoader;
use crate::models::{listing_pairs, AppConfig, SupportedFormat, DEFAULT_QUALITY};

/// Error type for page rendering
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Title, description and Open Graph data for a page
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub url: String,
    pub site_name: String,
    pub og_image: Option<String>,
}

/// A conversion link on the home page
#[derive(Debug, Clone, Serialize)]
pub struct PairLink {
    pub from: SupportedFormat,
    pub to: SupportedFormat,
    pub href: String,
}

/// One `<url>` element of the sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Renders the home page, converter pages and sitemap
pub struct PageService {
    tera: Tera,
    config: Arc<AppConfig>,
}

impl PageService {
    /// Load all templates (embedded, or overridden from TEMPLATES_DIR)
    pub fn new(loader: &AssetLoader, config: Arc<AppConfig>) -> Result<Self, PageError> {
        let templates = loader.templates()?;
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)?;

        tracing::info!(
            templates = tera.get_template_names().count(),
            "Page service initialized"
        );

        Ok(Self { tera, config })
    }

    /// Base URL for absolute links: configured URL, else the request host.
    ///
    /// Templates emit the result unescaped, so a host containing anything
    /// other than host/port characters is ignored.
    pub fn base_url(&self, host: Option<&str>) -> String {
        match (self.config.base_url(), host.filter(|h| is_plain_host(h))) {
            (Some(url), _) => url.to_string(),
            (None, Some(host)) => format!("http://{host}"),
            (None, None) => "http://localhost:3000".to_string(),
        }
    }

    fn meta(&self, title: String, base_url: &str) -> PageMeta {
        let site = &self.config.site;
        PageMeta {
            title,
            description: site.description.clone(),
            keywords: site.keywords.join(", "),
            url: base_url.to_string(),
            site_name: site.name.clone(),
            og_image: site
                .og_image
                .as_ref()
                .map(|path| format!("{base_url}{path}")),
        }
    }

    /// Home page listing every non-identity conversion pair
    pub fn render_home(&self, base_url: &str) -> Result<String, PageError> {
        let pairs: Vec<PairLink> = listing_pairs()
            .map(|(from, to)| PairLink {
                from,
                to,
                href: format!("/{from}/{to}"),
            })
            .collect();

        let mut context = Context::new();
        context.insert(
            "meta",
            &self.meta(
                format!("{} | Convert Images Easily", self.config.site.name),
                base_url,
            ),
        );
        context.insert("pairs", &pairs);

        Ok(self.tera.render("index.html", &context)?)
    }

    /// Converter page with the upload form for one format pair
    pub fn render_converter(
        &self,
        from: SupportedFormat,
        to: SupportedFormat,
        base_url: &str,
    ) -> Result<String, PageError> {
        let title = format!(
            "Convert {} to {} | {}",
            from.label().to_uppercase(),
            to.label().to_uppercase(),
            self.config.site.name
        );

        let mut context = Context::new();
        context.insert("meta", &self.meta(title, base_url));
        context.insert("from", &from);
        context.insert("to", &to);
        context.insert("default_quality", &DEFAULT_QUALITY);

        Ok(self.tera.render("converter.html", &context)?)
    }

    /// Sitemap entries: the home page, then every listed pair
    pub fn sitemap_entries(&self, base_url: &str, today: NaiveDate) -> Vec<SitemapEntry> {
        let lastmod = today.format("%Y-%m-%d").to_string();

        let home = SitemapEntry {
            loc: base_url.to_string(),
            lastmod: lastmod.clone(),
            changefreq: "yearly",
            priority: "1.0",
        };

        std::iter::once(home)
            .chain(listing_pairs().map(|(from, to)| SitemapEntry {
                loc: format!("{base_url}/{from}/{to}"),
                lastmod: lastmod.clone(),
                changefreq: "weekly",
                priority: "0.8",
            }))
            .collect()
    }

    /// Sitemap XML
    pub fn render_sitemap(&self, base_url: &str, today: NaiveDate) -> Result<String, PageError> {
        let mut context = Context::new();
        context.insert("entries", &self.sitemap_entries(base_url, today));
        Ok(self.tera.render("sitemap.xml", &context)?)
    }
}

fn is_plain_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
}
