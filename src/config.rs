use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::fs;
use anyhow::Result;

/// Central configuration for lanscout
///
/// There is no flag surface; everything a run needs is deploy-time
/// configuration loaded from the platform config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub nmap_path: PathBuf,
    pub target_range: String,
    pub ports: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nmap_path: PathBuf::from("nmap"),
            target_range: "192.168.0.0/24".to_string(),
            ports: "22,80,443,8080,8000,3389".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the standard config directory
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the standard config directory
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("lanscout");
        path.push("config.json");
        path
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.nmap_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("nmap_path must not be empty"));
        }

        if self.target_range.trim().is_empty() {
            return Err(anyhow::anyhow!("target_range must not be empty"));
        }

        if self.ports.trim().is_empty() {
            return Err(anyhow::anyhow!("ports must not be empty"));
        }

        // The port list is handed to nmap verbatim, so reject anything it
        // would choke on before a scan is attempted.
        for entry in self.ports.split(',') {
            let entry = entry.trim();
            if entry == "0" || entry.parse::<u16>().is_err() {
                return Err(anyhow::anyhow!(
                    "ports must be a comma-separated list of port numbers, got '{}'",
                    entry
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.nmap_path, deserialized.nmap_path);
        assert_eq!(config.target_range, deserialized.target_range);
        assert_eq!(config.ports, deserialized.ports);
    }

    #[test]
    fn test_empty_target_range_rejected() {
        let config = Config {
            target_range: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_numeric_port_rejected() {
        let config = Config {
            ports: "22,http,443".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_port_zero_rejected() {
        let config = Config {
            ports: "0".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spaced_port_list_accepted() {
        let config = Config {
            ports: "22, 80, 443".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
