//! Per-user locations and path expansion.
//!
//! Configuration lives in the platform config directory and trace output in the data
//! directory, both under a `storefront` subdirectory:
//!
//! | Platform | Config                                   | Data                                |
//! |----------|------------------------------------------|-------------------------------------|
//! | Linux    | `~/.config/storefront/config.toml`       | `~/.local/share/storefront`         |
//! | macOS    | `~/Library/Application Support/storefront/config.toml` | same directory        |

use std::path::{Path, PathBuf};

const APP_DIR: &str = "storefront";

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Data directory for trace output.
///
/// Falls back to the working directory when the platform reports none.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default configuration file path, if the platform has a config directory.
#[must_use]
pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when no home directory is known, are
/// returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, dirs::home_dir().as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (_, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        _ => PathBuf::from(path),
    }
}

/// Resolves a configured file path: `~` is expanded and relative paths are placed in
/// [`data_dir`].
#[must_use]
pub fn resolve_data_path(path: &str) -> PathBuf {
    resolve_in(&expand_tilde(path), &data_dir())
}

fn resolve_in(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_against_home() {
        let home = Path::new("/home/buyer");
        assert_eq!(expand_tilde_with("~", Some(home)), PathBuf::from("/home/buyer"));
        assert_eq!(
            expand_tilde_with("~/traces/app.jsonl", Some(home)),
            PathBuf::from("/home/buyer/traces/app.jsonl")
        );
        assert_eq!(expand_tilde_with("~other/x", Some(home)), PathBuf::from("~other/x"));
        assert_eq!(expand_tilde_with("~/x", None), PathBuf::from("~/x"));
    }

    #[test]
    fn relative_paths_land_in_base() {
        let base = Path::new("/data/storefront");
        assert_eq!(
            resolve_in(Path::new("trace.jsonl"), base),
            PathBuf::from("/data/storefront/trace.jsonl")
        );
        assert_eq!(
            resolve_in(Path::new("/tmp/trace.jsonl"), base),
            PathBuf::from("/tmp/trace.jsonl")
        );
    }

    #[test]
    fn config_file_is_named_config_toml() {
        if let Some(path) = config_file() {
            assert!(path.ends_with(Path::new(APP_DIR).join(CONFIG_FILE_NAME)));
        }
    }
}
