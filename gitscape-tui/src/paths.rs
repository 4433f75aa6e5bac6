//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "norpie";
const APPLICATION: &str = "gitscape";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, home of the log files.
///
/// - Linux: `$XDG_CACHE_HOME/gitscape` or `~/.cache/gitscape`
/// - macOS: `~/Library/Caches/dev.norpie.gitscape`
/// - Windows: `C:\Users\<User>\AppData\Local\norpie\gitscape\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/gitscape` or `~/.config/gitscape`
/// - macOS: `~/Library/Application Support/dev.norpie.gitscape`
/// - Windows: `C:\Users\<User>\AppData\Roaming\norpie\gitscape\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Settings file read when no `--config` is given.
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.json"))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

/// Rotate logs: archive latest.log under a timestamp, then prune old ones.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    if fs::create_dir_all(&cache).is_err() {
        return;
    }
    let latest = cache.join("latest.log");

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let archived = cache.join(format!("{}.log", timestamp));
        let _ = fs::rename(&latest, &archived);
    }

    cleanup_old_logs(&cache, MAX_OLD_LOGS);
}

/// Remove archived logs, keeping only the most recent `keep`.
fn cleanup_old_logs(cache_dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(cache_dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > keep {
        for entry in logs.iter().take(logs.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
