//! Platform-specific directory utilities

use std::path::PathBuf;

/// Get the platform-specific log directory
///
/// Follows platform conventions:
/// - macOS: `~/Library/Caches/dpr/logs`
/// - Linux: `~/.cache/dpr/logs` (or `$XDG_CACHE_HOME/dpr/logs`)
/// - Windows: `%LOCALAPPDATA%\dpr\logs`
/// - Fallback: `/tmp/dpr/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "dpr")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/dpr"))
        .join("logs")
}
