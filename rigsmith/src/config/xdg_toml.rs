//! `$XDG_CONFIG_HOME/<app>/config.toml`.

use std::path::{Path, PathBuf};

use super::{LoadError, RigConfig};

fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config directory".to_string()))
}

/// Path of the app's config file, or `None` when it does not exist.
pub fn xdg_config_path(app_name: &str) -> Result<Option<PathBuf>, LoadError> {
    let path = config_home()?.join(app_name).join("config.toml");
    Ok(path.is_file().then_some(path))
}

/// Reads one config file. Missing sections and fields take their defaults.
pub fn load_file(path: &Path) -> Result<RigConfig, LoadError> {
    let content = std::fs::read_to_string(path).map_err(LoadError::Read)?;
    Ok(toml::from_str(&content)?)
}
