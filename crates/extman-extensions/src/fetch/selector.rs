//! Install type resolution
//!
//! Maps the `install_type` tag of a registry record to a strategy
//! constructor. Records without a tag are offered to URL matchers in
//! registration order; only Git registers one by default.

use super::{Checkout, Download, FetchStrategy};
use extman_core::{is_valid_extension_name, Error, ExtensionRecord, Result};
use tracing::debug;

/// Builds a strategy from a registry record
pub type StrategyConstructor = fn(&ExtensionRecord) -> Result<FetchStrategy>;

/// Claims a record by its URL when no install type is given
pub type UrlMatcher = fn(&str) -> bool;

/// Explicit tag -> constructor table
pub struct StrategySelector {
    constructors: Vec<(&'static str, StrategyConstructor)>,
    matchers: Vec<(&'static str, UrlMatcher)>,
}

impl StrategySelector {
    /// An empty selector with nothing registered
    pub fn empty() -> Self {
        Self {
            constructors: Vec::new(),
            matchers: Vec::new(),
        }
    }

    /// Register a constructor for `tag`; tags are unique and case-sensitive
    pub fn register(&mut self, tag: &'static str, constructor: StrategyConstructor) -> Result<()> {
        if self.constructors.iter().any(|(t, _)| *t == tag) {
            return Err(Error::invalid_config(format!(
                "install type '{}' is registered twice",
                tag
            )));
        }
        self.constructors.push((tag, constructor));
        Ok(())
    }

    /// Let records without an install type select `tag` when `matcher` accepts their URL
    pub fn register_matcher(&mut self, tag: &'static str, matcher: UrlMatcher) -> Result<()> {
        if !self.constructors.iter().any(|(t, _)| *t == tag) {
            return Err(Error::invalid_config(format!(
                "matcher registered for unknown install type '{}'",
                tag
            )));
        }
        self.matchers.push((tag, matcher));
        Ok(())
    }

    /// Registered tags in registration order
    pub fn tags(&self) -> Vec<&'static str> {
        self.constructors.iter().map(|(tag, _)| *tag).collect()
    }

    /// Pick and construct the strategy for `record`
    pub fn select(&self, record: &ExtensionRecord) -> Result<FetchStrategy> {
        if !is_valid_extension_name(&record.name) {
            return Err(Error::invalid_name(&record.name));
        }

        let tag = match record.install_type() {
            Some(tag) => tag,
            None => self.match_url(record).ok_or_else(|| {
                Error::unknown_install_type("<none>", &self.tags())
            })?,
        };

        let constructor = self
            .constructors
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, c)| *c)
            .ok_or_else(|| Error::unknown_install_type(tag, &self.tags()))?;

        debug!("Selected {} strategy for {}", tag, record.name);
        constructor(record)
    }

    fn match_url(&self, record: &ExtensionRecord) -> Option<&'static str> {
        let url = record.repository_url.as_deref()?;
        self.matchers
            .iter()
            .find(|(_, matches)| matches(url))
            .map(|(tag, _)| *tag)
    }
}

impl Default for StrategySelector {
    /// Git, Subversion, Gem, Tarball and Zip, with Git claiming `.git` URLs
    fn default() -> Self {
        Self {
            constructors: vec![
                ("Git", git as StrategyConstructor),
                ("Subversion", subversion),
                ("Gem", gem),
                ("Tarball", tarball),
                ("Zip", zip),
            ],
            matchers: vec![("Git", is_git_url as UrlMatcher)],
        }
    }
}

/// Equivalent to the pattern `\.?git`: the optional dot never changes the outcome
pub fn is_git_url(url: &str) -> bool {
    url.contains("git")
}

fn repository_url(record: &ExtensionRecord) -> Result<&str> {
    non_blank(record.repository_url.as_deref())
        .ok_or_else(|| Error::missing_field(&record.name, "repository_url"))
}

fn download_url(record: &ExtensionRecord) -> Result<&str> {
    non_blank(record.download_url.as_deref())
        .ok_or_else(|| Error::missing_field(&record.name, "download_url"))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn git(record: &ExtensionRecord) -> Result<FetchStrategy> {
    Ok(FetchStrategy::Checkout(Checkout::git(
        repository_url(record)?,
        &record.name,
    )))
}

fn subversion(record: &ExtensionRecord) -> Result<FetchStrategy> {
    Ok(FetchStrategy::Checkout(Checkout::subversion(
        repository_url(record)?,
        &record.name,
    )))
}

fn gem(record: &ExtensionRecord) -> Result<FetchStrategy> {
    Ok(FetchStrategy::Download(Download::gem(
        download_url(record)?,
        &record.name,
    )))
}

fn tarball(record: &ExtensionRecord) -> Result<FetchStrategy> {
    Ok(FetchStrategy::Download(Download::tarball(
        download_url(record)?,
        &record.name,
    )))
}

fn zip(record: &ExtensionRecord) -> Result<FetchStrategy> {
    Ok(FetchStrategy::Download(Download::zip(
        download_url(record)?,
        &record.name,
    )))
}
