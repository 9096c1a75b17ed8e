/// Saved progress: the highest level reached.
///
/// ## File format:
///   `progress.toml`, a single table:
///   ```toml
///   best_level = 2
///   ```
///
/// Levels are zero-based. A missing or unreadable file means "start at
/// level 0"; a broken file is logged and ignored.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PROGRESS_FILE: &str = "progress.toml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub best_level: usize,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("cannot write {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("cannot encode progress: {0}")]
    Encode(#[from] toml::ser::Error),
}

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

fn save_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let test_path = parent.join(".write_test_ashgate");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/ashgate) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/ashgate");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn progress_path() -> PathBuf {
    save_dir().join(PROGRESS_FILE)
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

pub fn load_progress() -> Progress {
    load_from(&progress_path())
}

/// Raise the saved best level to `level` (never lowers it).
/// Returns the resulting progress.
pub fn record_level(level: usize) -> Progress {
    let path = progress_path();
    let mut progress = load_from(&path);
    if level > progress.best_level {
        progress.best_level = level;
        match save_to(&path, &progress) {
            Ok(()) => info!("progress saved: level {}", level + 1),
            Err(e) => warn!("{e}"),
        }
    }
    progress
}

// ══════════════════════════════════════════════════════════════
// File I/O
// ══════════════════════════════════════════════════════════════

fn load_from(path: &Path) -> Progress {
    let Ok(text) = std::fs::read_to_string(path) else {
        return Progress::default();
    };
    parse(&text).unwrap_or_else(|e| {
        warn!("ignoring {}: {e}", path.display());
        Progress::default()
    })
}

fn save_to(path: &Path, progress: &Progress) -> Result<(), SaveError> {
    let text = serialize(progress)?;
    std::fs::write(path, text).map_err(|source| SaveError::Io { path: path.to_path_buf(), source })
}

fn parse(text: &str) -> Result<Progress, toml::de::Error> {
    toml::from_str(text)
}

fn serialize(progress: &Progress) -> Result<String, toml::ser::Error> {
    toml::to_string(progress)
}
