//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (`OMNIBASE_ROOT_FOLDER`)
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("OMNIBASE_ROOT_FOLDER") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Ensure the root folder exists, creating it if necessary
pub fn ensure_root_folder(root: &PathBuf) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        tracing::info!("Created root folder: {}", root.display());
    }
    Ok(())
}

/// Database file path inside the root folder
pub fn database_path(root: &std::path::Path) -> PathBuf {
    root.join("omnibase.db")
}

/// Translations file path inside the root folder
pub fn translations_path(root: &std::path::Path) -> PathBuf {
    root.join("language_translations.json")
}

/// Locate the platform configuration file
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/omnibase/config.toml first, then /etc/omnibase/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("omnibase").join("config.toml"));
        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/omnibase/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("omnibase").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("omnibase"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/omnibase"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("omnibase"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/omnibase"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("omnibase"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\omnibase"))
    } else {
        PathBuf::from("./omnibase_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some("/tmp/omnibase-test"));
        assert_eq!(root, PathBuf::from("/tmp/omnibase-test"));
    }

    #[test]
    fn database_path_under_root() {
        let root = PathBuf::from("/data/omnibase");
        assert_eq!(
            database_path(&root),
            PathBuf::from("/data/omnibase/omnibase.db")
        );
    }
}
