use crate::error::{FertiplanError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration, loaded from YAML with `${VAR}` environment
/// substitution.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory holding the guideline JSON tables.
    #[serde(default = "default_guidelines_dir")]
    pub guidelines_dir: PathBuf,
    /// Plan document the CLI commands operate on.
    #[serde(default)]
    pub plan_file: Option<PathBuf>,
    /// Owner whose entities the commands work with.
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

fn default_guidelines_dir() -> PathBuf {
    PathBuf::from("guidelines")
}

fn default_user_id() -> i64 {
    1
}

impl Config {
    /// Load the configuration. An explicit override path must exist;
    /// without one the standard locations are searched and missing
    /// config falls back to the defaults.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(FertiplanError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| FertiplanError::Config(format!("Failed to read config: {}", e)))?;
        let config_str = Self::substitute_env_vars(&config_str);
        serde_yaml::from_str(&config_str)
            .map_err(|e| FertiplanError::Config(format!("Failed to parse config: {}", e)))
    }

    /// First existing config in the standard locations: the working
    /// directory, then the XDG config directory.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }
        let xdg_config = dirs::config_dir()?.join("fertiplan").join("config.yaml");
        if xdg_config.exists() {
            return Some(xdg_config);
        }
        None
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();
        let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return result,
        };
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }
        result
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            guidelines_dir: default_guidelines_dir(),
            plan_file: None,
            user_id: default_user_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml_with_env_substitution() {
        std::env::set_var("FERTIPLAN_TEST_DIR", "/tmp/tables");
        let yaml = "guidelines_dir: ${FERTIPLAN_TEST_DIR}\nuser_id: 7\n";
        let substituted = Config::substitute_env_vars(yaml);
        let config: Config = serde_yaml::from_str(&substituted).unwrap();
        assert_eq!(config.guidelines_dir, PathBuf::from("/tmp/tables"));
        assert_eq!(config.user_id, 7);
        assert_eq!(config.plan_file, None);
    }

    #[test]
    fn defaults_without_a_config_file() {
        let config = Config::default();
        assert_eq!(config.guidelines_dir, PathBuf::from("guidelines"));
        assert_eq!(config.user_id, 1);
    }
}
