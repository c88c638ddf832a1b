use std::fs;
use std::path::{Path, PathBuf};

use cf_core::CaseFileError;
use cf_story::{GlossaryMode, TypewriterSpeed};
use serde::Deserialize;

use crate::{map_cli_config_invalid, map_cli_config_read};

pub(crate) const DEFAULT_INITIAL_PATH: &str = "/dashboard";
pub(crate) const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct CaseFileConfig {
    pub(crate) typewriter_speed: TypewriterSpeed,
    pub(crate) glossary_mode: GlossaryMode,
    pub(crate) initial_path: String,
    pub(crate) log_filter: String,
}

impl Default for CaseFileConfig {
    fn default() -> Self {
        Self {
            typewriter_speed: TypewriterSpeed::Normal,
            glossary_mode: GlossaryMode::Detective,
            initial_path: DEFAULT_INITIAL_PATH.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Loads the config named on the command line, or the first default
/// location that exists. No file at all means defaults.
pub(crate) fn load_config(explicit: Option<&str>) -> Result<CaseFileConfig, CaseFileError> {
    if let Some(path) = explicit {
        return read_config(Path::new(path));
    }
    match config_path() {
        Some(path) if path.is_file() => read_config(&path),
        _ => Ok(CaseFileConfig::default()),
    }
}

pub(crate) fn read_config(path: &Path) -> Result<CaseFileConfig, CaseFileError> {
    let content = fs::read_to_string(path).map_err(map_cli_config_read)?;
    parse_config(&content)
}

pub(crate) fn parse_config(content: &str) -> Result<CaseFileConfig, CaseFileError> {
    toml::from_str::<CaseFileConfig>(content).map_err(map_cli_config_invalid)
}

pub(crate) fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CASEFILE_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("casefile").join("config.toml"));
    }
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(".config").join("casefile").join("config.toml"))
}
