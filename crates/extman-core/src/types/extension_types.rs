//! Registry record types

use serde::{Deserialize, Serialize};

/// Remote catalog entry for an extension
///
/// Field names follow the registry's underscored form; the camelCase spellings
/// are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    /// Unique identifier in underscored form
    pub name: String,

    /// Tag selecting a fetch strategy (e.g. "Git", "Tarball")
    #[serde(default, alias = "installType", skip_serializing_if = "Option::is_none")]
    pub install_type: Option<String>,

    /// Repository URL for checkout-based install types
    #[serde(
        default,
        alias = "repositoryUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub repository_url: Option<String>,

    /// Archive URL for download-based install types
    #[serde(default, alias = "downloadUrl", skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExtensionRecord {
    /// Create a record with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            install_type: None,
            repository_url: None,
            download_url: None,
            description: None,
        }
    }

    /// Set the install type tag
    pub fn with_install_type(mut self, install_type: impl Into<String>) -> Self {
        self.install_type = Some(install_type.into());
        self
    }

    /// Set the repository URL
    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }

    /// Set the download URL
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    /// Install type, treating an empty string as absent
    pub fn install_type(&self) -> Option<&str> {
        self.install_type.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accepts_underscored_fields() {
        let json = r#"{
            "name": "page_attachments",
            "install_type": "Git",
            "repository_url": "https://github.com/example/page_attachments.git"
        }"#;
        let record: ExtensionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.name, "page_attachments");
        assert_eq!(record.install_type(), Some("Git"));
        assert!(record.download_url.is_none());
    }

    #[test]
    fn test_record_accepts_camel_case_fields() {
        let json = r#"{
            "name": "widget",
            "installType": "Tarball",
            "downloadUrl": "https://example.com/widget-1.2.tar.gz"
        }"#;
        let record: ExtensionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.install_type(), Some("Tarball"));
        assert_eq!(
            record.download_url.as_deref(),
            Some("https://example.com/widget-1.2.tar.gz")
        );
    }

    #[test]
    fn test_blank_install_type_is_absent() {
        let record = ExtensionRecord::new("x").with_install_type("  ");
        assert_eq!(record.install_type(), None);
    }
}
