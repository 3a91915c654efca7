//! Shared utility functions for extman crates

use anyhow::anyhow;
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// containerised runs with an overridden HOME resolve consistently.
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Normalise a user-supplied extension name to its underscored form
///
/// `PageAttachments`, `page-attachments` and `page_attachments` all map to
/// `page_attachments`. Acronym runs are split before their last capital
/// (`HTMLFilter` -> `html_filter`).
pub fn to_extension_name(input: &str) -> String {
    let chars: Vec<char> = input.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }

        out.extend(c.to_lowercase());
    }

    out
}

/// Whether `name` is a normalised extension name: non-empty, `[a-z0-9_]` only
///
/// Such a name is always a single path component and a single task segment.
pub fn is_valid_extension_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_home_dir_from_env() {
        if std::env::var("HOME").is_ok() {
            let home = get_home_dir().unwrap();
            assert!(!home.as_os_str().is_empty());
        }
    }

    #[test]
    fn test_to_extension_name() {
        assert_eq!(to_extension_name("page_attachments"), "page_attachments");
        assert_eq!(to_extension_name("PageAttachments"), "page_attachments");
        assert_eq!(to_extension_name("page-attachments"), "page_attachments");
        assert_eq!(to_extension_name("HTMLFilter"), "html_filter");
        assert_eq!(to_extension_name("Ext2Go"), "ext2_go");
        assert_eq!(to_extension_name("my_ext"), "my_ext");
        assert_eq!(to_extension_name("  Reorder "), "reorder");
    }

    #[test]
    fn test_is_valid_extension_name() {
        assert!(is_valid_extension_name("page_attachments"));
        assert!(is_valid_extension_name("ext2_go"));
        assert!(!is_valid_extension_name(""));
        assert!(!is_valid_extension_name(".."));
        assert!(!is_valid_extension_name("../escaped"));
        assert!(!is_valid_extension_name("a/b"));
        assert!(!is_valid_extension_name("a\\b"));
        assert!(!is_valid_extension_name("my.ext"));
        assert!(!is_valid_extension_name("PageAttachments"));
        assert!(!is_valid_extension_name(&to_extension_name("../escaped")));
    }
}
