use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Defaults for the command line, read from `config.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Seed used when `--seed` is not given. Unset means a fresh seed per run.
    pub seed: Option<u64>,
    pub pretty_export: bool,
    pub show_tree: bool,
    /// Document loaded when no path is passed.
    pub document: Option<PathBuf>,
}

fn get_config_path() -> Option<PathBuf> {
    ProjectDirs::from("me", "chunkmix", "chunkmix")
        .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
}

pub fn parse_config(toml_str: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

pub fn load_config() -> AppConfig {
    if let Some(path) = get_config_path() {
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(toml_str) => match parse_config(&toml_str) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Failed to parse config file, using defaults: {}", e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read config file, using defaults: {}", e);
                }
            }
        }
    }
    // Return default if file doesn't exist or on any error
    AppConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = parse_config("seed = 42\n").unwrap();
        assert_eq!(config.seed, Some(42));
        assert!(!config.pretty_export);
        assert!(config.document.is_none());
    }

    #[test]
    fn reads_every_key() {
        let config = parse_config(
            "seed = 7\npretty_export = true\nshow_tree = true\ndocument = \"mixes/default.json\"\n",
        )
        .unwrap();
        assert_eq!(
            config,
            AppConfig {
                seed: Some(7),
                pretty_export: true,
                show_tree: true,
                document: Some(PathBuf::from("mixes/default.json")),
            }
        );
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(parse_config("seed = \"abc\"\n").is_err());
    }
}
