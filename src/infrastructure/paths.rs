//! Data directory resolution.
//!
//! Everything the client persists lives under one directory:
//!
//! ```text
//! <data_dir>/
//! ├── local-storage.json     favorites and other key-value entries
//! └── cinemaguide-otlp.json  exported trace spans (when tracing is enabled)
//! ```
//!
//! The directory is, in order of preference, the configured override,
//! `$XDG_DATA_HOME/cinemaguide`, `$HOME/.local/share/cinemaguide`, and
//! finally `.cinemaguide` in the working directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "cinemaguide";

/// File name of the key-value store inside the data directory.
pub const STORAGE_FILE: &str = "local-storage.json";

/// File name of the trace export inside the data directory.
pub const TRACE_FILE: &str = "cinemaguide-otlp.json";

/// Returns the data directory, honoring `override_dir` when given.
///
/// A leading `~` in the override is expanded to `$HOME`.
#[must_use]
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    resolve(
        override_dir,
        std::env::var_os("XDG_DATA_HOME"),
        std::env::var_os("HOME"),
    )
}

fn resolve(override_dir: Option<&Path>, xdg: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let home = home.filter(|h| !h.is_empty()).map(PathBuf::from);

    if let Some(dir) = override_dir {
        return expand_with(dir, home.as_deref());
    }
    if let Some(xdg) = xdg.filter(|x| !x.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    match home {
        Some(home) => home.join(".local").join("share").join(APP_DIR),
        None => PathBuf::from(format!(".{APP_DIR}")),
    }
}

/// Path of the key-value store file under `data_dir`.
#[must_use]
pub fn storage_file(data_dir: &Path) -> PathBuf {
    data_dir.join(STORAGE_FILE)
}

/// Path of the trace export file under `data_dir`.
#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TRACE_FILE)
}

/// Expands a leading `~` component to `home`.
fn expand_with(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
