use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub storage: StorageConfig,
}

/// Completion-service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier (e.g. "gpt-4o").
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path. Defaults to the platform data directory.
    pub db_path: Option<PathBuf>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            completion: CompletionConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults if no file is given or
    /// the path does not exist.
    pub fn load_or_default(path: Option<&PathBuf>) -> anyhow::Result<Self> {
        match path {
            Some(p) if p.exists() => Self::from_file(p),
            _ => Ok(Self::default()),
        }
    }

    /// Resolve the database path, defaulting under the platform data dir.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.storage.db_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("learnmate")
                .join("learnmate.db")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.completion.model, "gpt-4o");
        assert_eq!(config.completion.api_key_env, "OPENAI_API_KEY");
        assert!(config.storage.db_path.is_none());
    }

    #[test]
    fn test_load_or_default_missing_path() {
        let config = AppConfig::load_or_default(Some(&PathBuf::from("/nonexistent.yaml"))).unwrap();
        assert_eq!(config.completion.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "completion:\n  model: gpt-4o-mini\n  timeout_secs: 30").unwrap();
        let config = AppConfig::from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.completion.timeout_secs, 30);
        // untouched fields keep their defaults
        assert_eq!(config.completion.api_key_env, "OPENAI_API_KEY");
    }
}
