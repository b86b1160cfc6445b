use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{PanelError, Result};

const APP_DIR: &str = "medipanel";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub locale: String,
    pub api_base_url: String,
    /// Upper bound for a wizard submission; absent means wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_timeout_secs: Option<u64>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            locale: "es-VE".into(),
            api_base_url: "http://localhost:8000/api".into(),
            submit_timeout_secs: None,
        }
    }
}

impl PanelConfig {
    pub fn submit_deadline(&self) -> Option<Duration> {
        self.submit_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Joins `path` onto the configured base URL.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| PanelError::Config("no configuration directory available".into()))?;
        Self::with_base_dir(base.join(APP_DIR))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<PanelConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config = serde_json::from_str(&data)?;
            debug!(path = %self.path.display(), "configuration loaded");
            Ok(config)
        } else {
            Ok(PanelConfig::default())
        }
    }

    pub fn save(&self, config: &PanelConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), PanelConfig::default());
        assert_eq!(manager.load().unwrap().submit_deadline(), None);
    }

    #[test]
    fn save_then_load_restores_values() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().join("nested")).unwrap();
        let config = PanelConfig {
            submit_timeout_secs: Some(15),
            api_base_url: "https://panel.example/api/".into(),
            ..PanelConfig::default()
        };
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.submit_deadline(), Some(Duration::from_secs(15)));
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "locale": "en-US" }"#).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.locale, "en-US");
        assert_eq!(loaded.api_base_url, PanelConfig::default().api_base_url);
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        let config = PanelConfig {
            submit_timeout_secs: Some(0),
            ..PanelConfig::default()
        };
        assert_eq!(config.submit_deadline(), None);
    }

    #[test]
    fn endpoint_url_joins_cleanly() {
        let config = PanelConfig {
            api_base_url: "https://panel.example/api/".into(),
            ..PanelConfig::default()
        };
        assert_eq!(
            config.endpoint_url("/patients/"),
            "https://panel.example/api/patients/"
        );
    }
}
