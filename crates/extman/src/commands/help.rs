//! `extman help [command]`

const BASIC: &str = "\
Usage: extman [options] [command] [arguments]

  Commands:

    install     Install an extension from the registry.
    uninstall   Uninstall a previously installed extension.
    help        Display help for commands

Type 'extman help [command]' for information about that command.";

const INSTALL: &str = "\
Usage: extman install extension_name

  - Installs an extension from the information in the registry.";

const UNINSTALL: &str = "\
Usage: extman uninstall extension_name

  - Uninstalls a previously installed extension.";

/// Help text for `topic`; unknown topics get the general usage
pub fn text(topic: Option<&str>) -> &'static str {
    match topic {
        Some("install") => INSTALL,
        Some("uninstall") => UNINSTALL,
        _ => BASIC,
    }
}

pub fn run(topic: Option<&str>) {
    println!("{}", text(topic));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics() {
        assert!(text(None).starts_with("Usage: extman [options]"));
        assert!(text(Some("install")).contains("Installs an extension"));
        assert!(text(Some("uninstall")).contains("Uninstalls a previously installed"));
    }

    #[test]
    fn test_basic_help_and_unknown_fall_back_to_usage() {
        for topic in ["basic", "help", "frobnicate"] {
            assert_eq!(text(Some(topic)), text(None));
        }
    }
}
