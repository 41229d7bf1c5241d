//! Platform-specific paths for config and session files

use std::path::PathBuf;

/// Get the platform-specific config directory
///
/// Returns:
/// - Windows: %APPDATA%\Vaultline
/// - macOS: ~/Library/Application Support/Vaultline
/// - Linux/Other: ~/.config/Vaultline
pub fn get_config_dir() -> PathBuf {
    let base = dirs::config_dir()
        .or_else(dirs::data_dir)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("Vaultline")
}

/// Get the default config file path
pub fn get_default_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Get the path of the persisted login session
pub fn get_session_path() -> PathBuf {
    get_config_dir().join("session.json")
}
