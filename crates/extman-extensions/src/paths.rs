//! Installed extension layout
//!
//! An extension is installed iff a directory named exactly after it exists
//! directly under one of the scanned `vendor/extensions` directories.

use extman_core::{is_valid_extension_name, ExtmanConfig};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPaths {
    /// Writable extensions directory of the application root
    install_root: PathBuf,
    /// Every extensions directory checked for an installed extension, install root first
    scan_roots: Vec<PathBuf>,
}

impl ExtensionPaths {
    pub fn new(install_root: impl Into<PathBuf>, scan_roots: Vec<PathBuf>) -> Self {
        let install_root = install_root.into();
        let mut roots = vec![install_root.clone()];
        for root in scan_roots {
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        Self {
            install_root,
            scan_roots: roots,
        }
    }

    pub fn from_config(config: &ExtmanConfig) -> Self {
        Self::new(config.install_root(), config.scan_roots())
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn scan_roots(&self) -> &[PathBuf] {
        &self.scan_roots
    }

    /// `<app-root>/vendor/extensions/<name>`
    pub fn install_dir(&self, name: &str) -> PathBuf {
        self.install_root.join(name)
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }

    /// First scanned directory holding `name`
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        if !is_valid_extension_name(name) {
            return None;
        }
        self.scan_roots
            .iter()
            .map(|root| root.join(name))
            .find(|dir| dir.is_dir())
    }

    /// Installed under the writable root, as opposed to a read-only extra root
    pub fn is_installed_locally(&self, name: &str) -> bool {
        is_valid_extension_name(name) && self.install_dir(name).is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_exact_name_match() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("vendor/extensions");
        fs::create_dir_all(root.join("page_attachments")).unwrap();
        fs::write(root.join("not_a_dir"), "").unwrap();

        let paths = ExtensionPaths::new(&root, vec![]);
        assert!(paths.is_installed("page_attachments"));
        assert!(!paths.is_installed("attachments"));
        assert!(!paths.is_installed("page"));
        assert!(!paths.is_installed("not_a_dir"));
        assert!(!paths.is_installed(".."));
    }

    #[test]
    fn test_extra_roots_are_scanned() {
        let app = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        let install_root = app.path().join("vendor/extensions");
        let shared_root = shared.path().join("vendor/extensions");
        fs::create_dir_all(shared_root.join("markdown_filter")).unwrap();

        let paths = ExtensionPaths::new(&install_root, vec![shared_root.clone()]);
        assert!(paths.is_installed("markdown_filter"));
        assert!(!paths.is_installed_locally("markdown_filter"));
        assert_eq!(
            paths.locate("markdown_filter"),
            Some(shared_root.join("markdown_filter"))
        );
    }

    #[test]
    fn test_from_config_deduplicates_roots() {
        let config = ExtmanConfig {
            app_root: PathBuf::from("/srv/app"),
            extra_roots: vec![PathBuf::from("/srv/app"), PathBuf::from("/opt/shared")],
            ..Default::default()
        };
        let paths = ExtensionPaths::from_config(&config);

        assert_eq!(
            paths.scan_roots(),
            &[
                PathBuf::from("/srv/app/vendor/extensions"),
                PathBuf::from("/opt/shared/vendor/extensions"),
            ]
        );
        assert_eq!(
            paths.install_dir("x"),
            PathBuf::from("/srv/app/vendor/extensions/x")
        );
    }
}
