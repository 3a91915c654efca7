//! Extension registry client
//!
//! Looks extension records up in the remote catalog at
//! `<registry-url>/extensions.json`. The listing is cached under the cache
//! directory for the configured TTL; when the registry cannot be reached an
//! expired cache is used as a fallback.

use async_trait::async_trait;
use extman_core::{Error, ExtensionRecord, ExtmanConfig, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const LISTING_PATH: &str = "extensions.json";
const CACHE_FILE: &str = "extensions.json";

/// Source of extension records
#[async_trait]
pub trait ExtensionCatalog: Send + Sync {
    /// Every record in the catalog
    async fn list_all(&self) -> Result<Vec<ExtensionRecord>>;

    /// The record named `name`, or `ExtensionNotFound`
    async fn find_by_name(&self, name: &str) -> Result<ExtensionRecord> {
        self.list_all()
            .await?
            .into_iter()
            .find(|record| record.name == name)
            .ok_or_else(|| Error::extension_not_found(name))
    }
}

/// Accepts a bare array or `{"extensions": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Bare(Vec<ExtensionRecord>),
    Wrapped { extensions: Vec<ExtensionRecord> },
}

impl Listing {
    fn into_records(self) -> Vec<ExtensionRecord> {
        match self {
            Self::Bare(records) | Self::Wrapped { extensions: records } => records,
        }
    }
}

/// HTTP client for the remote catalog
pub struct RegistryClient {
    base_url: String,
    cache_dir: Option<PathBuf>,
    cache_ttl: Duration,
    http: reqwest::Client,
}

impl RegistryClient {
    pub fn new(config: &ExtmanConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.http_secs))
            .user_agent(concat!("extman/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::registry(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.registry_url.clone(),
            cache_dir: Some(config.cache_dir.clone()),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            http,
        })
    }

    /// Disable the on-disk cache
    pub fn without_cache(mut self) -> Self {
        self.cache_dir = None;
        self
    }

    /// Full URL of the catalog listing
    pub fn listing_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), LISTING_PATH)
    }

    fn cache_path(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(CACHE_FILE))
    }

    /// Remove the cached listing so the next lookup hits the network
    pub fn invalidate_cache(&self) -> Result<()> {
        if let Some(path) = self.cache_path() {
            if path.exists() {
                std::fs::remove_file(&path)?;
                info!("Invalidated registry cache");
            }
        }
        Ok(())
    }

    async fn fetch_listing(&self) -> Result<String> {
        let url = self.listing_url();
        debug!("Fetching registry listing from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::registry(format!("GET {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::registry(format!(
                "GET {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::registry(format!("Failed to read {}: {}", url, e)))?;
        parse_listing(&body)?;
        Ok(body)
    }

    async fn load_listing(&self) -> Result<Vec<ExtensionRecord>> {
        let cache = self.cache_path();

        if let Some(path) = cache.as_deref().filter(|p| is_cache_valid(p, self.cache_ttl)) {
            debug!("Using cached registry listing {}", path.display());
            match std::fs::read_to_string(path).map_err(Error::from).and_then(|c| parse_listing(&c)) {
                Ok(records) => return Ok(records),
                Err(e) => warn!("Ignoring unreadable registry cache: {}", e),
            }
        }

        match self.fetch_listing().await {
            Ok(body) => {
                if let Some(path) = &cache {
                    if let Err(e) = write_cache(path, &body) {
                        warn!("Failed to cache registry listing: {}", e);
                    }
                }
                parse_listing(&body)
            }
            Err(e) => match cache.filter(|p| p.exists()) {
                Some(path) => {
                    warn!("{}. Using expired cache as fallback", e);
                    parse_listing(&std::fs::read_to_string(&path)?)
                }
                None => Err(e),
            },
        }
    }
}

#[async_trait]
impl ExtensionCatalog for RegistryClient {
    async fn list_all(&self) -> Result<Vec<ExtensionRecord>> {
        self.load_listing().await
    }
}

fn parse_listing(body: &str) -> Result<Vec<ExtensionRecord>> {
    serde_json::from_str::<Listing>(body)
        .map(Listing::into_records)
        .map_err(|e| Error::registry(format!("Malformed registry listing: {}", e)))
}

fn write_cache(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)?;
    Ok(())
}

fn is_cache_valid(path: &Path, ttl: Duration) -> bool {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|age| age < ttl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_joins_without_double_slash() {
        let config = ExtmanConfig {
            registry_url: "http://ext.example.org/".to_string(),
            ..Default::default()
        };
        let client = RegistryClient::new(&config).unwrap();
        assert_eq!(client.listing_url(), "http://ext.example.org/extensions.json");
    }

    #[test]
    fn test_parse_listing_shapes() {
        let bare = r#"[{"name": "a", "installType": "Git", "repositoryUrl": "https://h/a.git"}]"#;
        let records = parse_listing(bare).unwrap();
        assert_eq!(records[0].install_type(), Some("Git"));

        let wrapped = r#"{"extensions": [{"name": "b", "download_url": "https://h/b.zip"}]}"#;
        let records = parse_listing(wrapped).unwrap();
        assert_eq!(records[0].download_url.as_deref(), Some("https://h/b.zip"));

        assert!(matches!(
            parse_listing("<html>"),
            Err(Error::Registry { .. })
        ));
    }

    #[test]
    fn test_cache_validity() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("extensions.json");
        assert!(!is_cache_valid(&path, Duration::from_secs(60)));

        std::fs::write(&path, "[]").unwrap();
        assert!(is_cache_valid(&path, Duration::from_secs(60)));
        assert!(!is_cache_valid(&path, Duration::ZERO));
    }
}
