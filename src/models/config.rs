use crate::assets::AssetLoader;
use serde::Deserialize;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Public site metadata used by pages and the sitemap
    #[serde(default)]
    pub site: SiteConfig,

    /// Request limits enforced by the HTTP layer
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Encoder tuning that is not exposed per request
    #[serde(default)]
    pub codec: CodecConfig,
}

/// Site metadata for page titles, Open Graph tags and sitemap URLs
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Public base URL (e.g. `https://convert.example.com`).
    /// Falls back to the request `Host` header when unset.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Path of the Open Graph preview image, relative to the base URL
    #[serde(default = "default_og_image")]
    pub og_image: Option<String>,
}

fn default_site_name() -> String {
    "Image Converter".to_string()
}

fn default_description() -> String {
    "A simple and efficient image converter application. Convert images between various \
     formats like JPEG, PNG, WebP, AVIF, TIFF, and GIF."
        .to_string()
}

fn default_keywords() -> Vec<String> {
    [
        "image converter",
        "convert images",
        "jpeg to png",
        "png to jpeg",
        "webp converter",
        "avif converter",
        "tiff converter",
        "gif converter",
        "image format conversion",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_og_image() -> Option<String> {
    Some("/static/1200x630.jpg".to_string())
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            base_url: None,
            description: default_description(),
            keywords: default_keywords(),
            og_image: default_og_image(),
        }
    }
}

/// Limits applied before a request reaches the converter
#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024 // 25 MiB
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Fixed encoder settings
#[derive(Debug, Deserialize, Clone)]
pub struct CodecConfig {
    /// AVIF encoder speed, 1 (slowest, smallest) to 10 (fastest)
    #[serde(default = "default_avif_speed")]
    pub avif_speed: u8,
}

fn default_avif_speed() -> u8 {
    8
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            avif_speed: default_avif_speed(),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        site = %config.site.name,
                        base_url = ?config.site.base_url,
                        max_upload_bytes = config.limits.max_upload_bytes,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Public base URL without a trailing slash, if configured
    pub fn base_url(&self) -> Option<&str> {
        self.site
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }
}
