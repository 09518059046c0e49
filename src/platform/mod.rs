// Aero shell platform paths
// Resolves where the shell keeps its settings file on each OS.

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides every platform default.
pub const DATA_DIR_ENV: &str = "AERO_DATA_DIR";

/// Returns the directory holding the shell's settings.
///
/// `$AERO_DATA_DIR` wins when set. Otherwise:
/// - **Linux**: `$XDG_CONFIG_HOME/aero` or `~/.config/aero`
/// - **macOS**: `~/Library/Application Support/Aero`
/// - **Windows**: `%APPDATA%/Aero`
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    platform_config_dir()
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

#[cfg(target_os = "macos")]
fn platform_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("Aero")
}

#[cfg(target_os = "windows")]
fn platform_config_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("Aero")
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("aero")
    } else {
        home_dir().join(".config").join("aero")
    }
}
