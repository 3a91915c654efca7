//! Parsing of archive names and unpack tool output
//!
//! Kept free of I/O so each contract can be checked against captured output.

use extman_core::{Error, Result};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

static QUOTED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^'\n]*)'").expect("quoted path regex is valid"));

/// Local file name for a download: the last non-empty path segment of the URL
pub fn archive_filename(url: &str) -> Result<String> {
    let name = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .unwrap_or_default()
            .to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    if name.is_empty() || name == "." || name == ".." {
        return Err(Error::fetch_failure(format!(
            "Cannot derive a file name from download URL '{}'",
            url
        )));
    }
    Ok(name)
}

/// Package base name used by the package manager: text before the first `-`
pub fn gem_base_name(filename: &str) -> &str {
    let stem = filename.strip_suffix(".gem").unwrap_or(filename);
    stem.split('-').next().unwrap_or(stem)
}

/// Whether the archive is gzip-compressed, judged from its name
pub fn is_gzip(filename: &str) -> bool {
    filename.contains("gz")
}

/// Extract the unpacked directory from the package manager's `unpack` output
///
/// The path is the first single-quoted substring, e.g.
/// `Unpacked gem: '/tmp/widget-1.2'`.
pub fn parse_gem_unpack_output(output: &str) -> Result<PathBuf> {
    let captured = QUOTED_PATH
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| {
            Error::fetch_parse(format!(
                "no quoted path in package manager output: {:?}",
                output.trim()
            ))
        })?;

    if captured.is_empty() {
        return Err(Error::fetch_parse(
            "package manager reported an empty unpack path",
        ));
    }
    Ok(PathBuf::from(captured))
}

/// Top-level directory produced by `tar xv`, taken from its verbose listing
///
/// Uses the first non-empty line of stdout (GNU tar), falling back to stderr
/// (bsdtar, which also prefixes entries with `x `). A leading `./` is skipped.
pub fn parse_tar_listing(stdout: &str, stderr: &str) -> Result<String> {
    let first_line = first_non_empty_line(stdout)
        .or_else(|| first_non_empty_line(stderr).map(|l| l.strip_prefix("x ").unwrap_or(l)))
        .ok_or_else(|| Error::fetch_parse("tar produced no listing"))?;

    let segment = first_line
        .trim()
        .split('/')
        .find(|s| !s.is_empty() && *s != ".")
        .ok_or_else(|| {
            Error::fetch_parse(format!(
                "cannot find a directory name in tar listing line {:?}",
                first_line
            ))
        })?;

    if segment == ".." {
        return Err(Error::fetch_parse(
            "tar listing points outside the extraction directory",
        ));
    }
    Ok(segment.to_string())
}

fn first_non_empty_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_filename() {
        assert_eq!(
            archive_filename("https://example.com/dl/widget-1.2.tar.gz").unwrap(),
            "widget-1.2.tar.gz"
        );
        assert_eq!(
            archive_filename("https://example.com/dl/widget.zip?token=abc").unwrap(),
            "widget.zip"
        );
        assert_eq!(
            archive_filename("https://example.com/gems/widget-0.3.gem/").unwrap(),
            "widget-0.3.gem"
        );
        assert_eq!(archive_filename("mirror/widget.zip").unwrap(), "widget.zip");
    }

    #[test]
    fn test_archive_filename_rejects_bare_host() {
        assert!(matches!(
            archive_filename("https://example.com/"),
            Err(Error::FetchFailure { .. })
        ));
    }

    #[test]
    fn test_gem_base_name() {
        assert_eq!(gem_base_name("widget-1.2.gem"), "widget");
        assert_eq!(gem_base_name("widget.gem"), "widget");
        assert_eq!(gem_base_name("radiant-tags-0.1.gem"), "radiant");
    }

    #[test]
    fn test_is_gzip() {
        assert!(is_gzip("widget-1.2.tar.gz"));
        assert!(is_gzip("widget-1.2.tgz"));
        assert!(!is_gzip("widget-1.2.tar"));
    }

    #[test]
    fn test_parse_gem_unpack_output() {
        let output = "Unpacked gem: '/tmp/widget-1.2'\n";
        assert_eq!(
            parse_gem_unpack_output(output).unwrap(),
            PathBuf::from("/tmp/widget-1.2")
        );
    }

    #[test]
    fn test_parse_gem_unpack_output_takes_first_match() {
        let output = "Unpacked gem: '/tmp/widget-1.2'\nAlso saw '/tmp/other'\n";
        assert_eq!(
            parse_gem_unpack_output(output).unwrap(),
            PathBuf::from("/tmp/widget-1.2")
        );
    }

    #[test]
    fn test_parse_gem_unpack_output_without_quotes_fails() {
        assert!(matches!(
            parse_gem_unpack_output("nothing useful here"),
            Err(Error::FetchParseError { .. })
        ));
        assert!(matches!(
            parse_gem_unpack_output("Unpacked gem: ''"),
            Err(Error::FetchParseError { .. })
        ));
    }

    #[test]
    fn test_parse_tar_listing_gnu() {
        let stdout = "widget-1.2/README\nwidget-1.2/lib/widget.rb\n";
        assert_eq!(parse_tar_listing(stdout, "").unwrap(), "widget-1.2");
    }

    #[test]
    fn test_parse_tar_listing_leading_dot_and_bsdtar() {
        assert_eq!(
            parse_tar_listing("./widget/README\n", "").unwrap(),
            "widget"
        );
        assert_eq!(
            parse_tar_listing("", "x widget-2.0/\nx widget-2.0/README\n").unwrap(),
            "widget-2.0"
        );
    }

    #[test]
    fn test_parse_tar_listing_empty_fails() {
        assert!(matches!(
            parse_tar_listing("", "\n\n"),
            Err(Error::FetchParseError { .. })
        ));
        assert!(matches!(
            parse_tar_listing("./\n", ""),
            Err(Error::FetchParseError { .. })
        ));
        assert!(matches!(
            parse_tar_listing("../evil/file\n", ""),
            Err(Error::FetchParseError { .. })
        ));
    }
}
