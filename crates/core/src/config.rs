//! Configuration management for Focus Coach.
//!
//! Configuration is layered, later sources winning:
//! 1. Built-in defaults
//! 2. The workspace config file (`.coach/config.yaml`, or an explicit path)
//! 3. Environment variables
//! 4. Command-line flags (`with_overrides`)

use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: &[&str] = &["ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .coach/)
    pub workspace: PathBuf,

    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Language model settings
    pub llm: LlmSettings,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Document index settings
    pub retrieval: RetrievalConfig,

    /// Chat turn settings
    pub chat: ChatConfig,

    /// Log filter override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit JSON log records
    pub log_json: bool,
}

/// Language model provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmSettings {
    /// Provider name (only "ollama" is built in)
    pub provider: String,

    /// Model identifier passed to the provider
    pub model: String,

    /// Base URL of the provider API
    pub endpoint: String,

    /// Request timeout for completions, in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "llama2".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind the listener on.
    ///
    /// `host` may be an IPv4 or IPv6 literal or a resolvable hostname.
    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| AppError::Config(format!("Invalid server host {}: {}", self.host, e)))?
            .next()
            .ok_or_else(|| AppError::Config(format!("Server host {} has no address", self.host)))
    }
}

/// Document index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrievalConfig {
    /// Vocabulary cap for the TF-IDF vector space (0 = unbounded)
    pub max_features: usize,

    /// Snippets retrieved per chat turn (0 disables retrieval)
    pub top_k: usize,

    /// Exclude English stop words from the vocabulary
    pub stop_words: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            top_k: 3,
            stop_words: true,
        }
    }
}

/// Chat turn settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatConfig {
    /// Number of most recent history turns included in the prompt
    pub history_window: usize,

    /// Prompt definition to load from `.coach/prompts/<id>.yml`
    pub prompt_id: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: 5,
            prompt_id: "coach.chat.default".to_string(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSettings>,
    server: Option<ServerConfig>,
    retrieval: Option<RetrievalConfig>,
    chat: Option<ChatConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

/// Command-line flags that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            llm: LlmSettings::default(),
            server: ServerConfig::default(),
            retrieval: RetrievalConfig::default(),
            chat: ChatConfig::default(),
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration for a workspace and config file, then apply
    /// the environment.
    ///
    /// Missing arguments fall back to the current directory and
    /// `<workspace>/.coach/config.yaml`.
    ///
    /// Environment variables:
    /// - `COACH_PROVIDER`: LLM provider
    /// - `COACH_MODEL`: Model identifier
    /// - `COACH_ENDPOINT`: Provider base URL
    /// - `RUST_LOG`: Log filter
    /// - `NO_COLOR`: Disable colored output
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::from_workspace(workspace, config_file)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Defaults merged with the config file, without reading the environment.
    pub fn from_workspace(
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
    ) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                path
            }
            None => config.coach_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config.merge_yaml(&config_path)?;
            config.config_file = Some(config_path);
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    ///
    /// Each section present in the file replaces the corresponding section;
    /// fields missing from a section take their defaults.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(llm) = file.llm {
            self.llm = llm;
        }
        if let Some(server) = file.server {
            self.server = server;
        }
        if let Some(retrieval) = file.retrieval {
            self.retrieval = retrieval;
        }
        if let Some(chat) = file.chat {
            self.chat = chat;
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
            if let Some(json) = logging.json {
                self.log_json = json;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(())
    }

    /// Environment variables override the config file.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup("COACH_PROVIDER") {
            self.llm.provider = provider;
        }

        if let Some(model) = lookup("COACH_MODEL") {
            self.llm.model = model;
        }

        if let Some(endpoint) = lookup("COACH_ENDPOINT") {
            self.llm.endpoint = endpoint;
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Apply CLI overrides to the configuration.
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(provider) = overrides.provider {
            self.llm.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.llm.model = model;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        if overrides.log_json {
            self.log_json = true;
        }

        self
    }

    /// Path to the .coach directory.
    pub fn coach_dir(&self) -> PathBuf {
        self.workspace.join(".coach")
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.llm.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.llm.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(AppError::Config("Model name cannot be empty".to_string()));
        }

        if self.server.port == 0 {
            return Err(AppError::Config("Server port cannot be 0".to_string()));
        }

        if self.chat.history_window == 0 {
            return Err(AppError::Config(
                "chat.historyWindow must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn write_config(dir: &Path, yaml: &str) {
        let coach_dir = dir.join(".coach");
        std::fs::create_dir_all(&coach_dir).unwrap();
        std::fs::write(coach_dir.join("config.yaml"), yaml).unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.model, "llama2");
        assert_eq!(
            config.server.bind_addr().unwrap(),
            "0.0.0.0:8000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.retrieval.max_features, 5000);
        assert_eq!(config.chat.history_window, 5);
        assert!(!config.verbose);
    }

    #[test]
    fn test_bind_addr_accepts_ipv6_host() {
        let server = ServerConfig {
            host: "::".to_string(),
            port: 9000,
        };
        let addr = server.bind_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 9000);

        let loopback = ServerConfig {
            host: "::1".to_string(),
            port: 8000,
        };
        assert_eq!(
            loopback.bind_addr().unwrap(),
            "[::1]:8000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_coach_dir() {
        let config = AppConfig::default();
        assert!(config.coach_dir().ends_with(".coach"));
    }

    #[test]
    fn test_missing_workspace_is_error() {
        let result = AppConfig::from_workspace(Some(PathBuf::from("/definitely/not/here")), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_yaml_sections_merge_over_defaults() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"
llm:
  model: mistral
  endpoint: http://ollama:11434
retrieval:
  maxFeatures: 200
  topK: 5
logging:
  level: debug
  color: false
"#,
        );

        let config = AppConfig::from_workspace(Some(temp.path().to_path_buf()), None).unwrap();
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.endpoint, "http://ollama:11434");
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.retrieval.max_features, 200);
        assert_eq!(config.retrieval.top_k, 5);
        assert!(config.retrieval.stop_words);
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.no_color);
        assert!(config.config_file.is_some());
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "server: [not, a, map");

        let result = AppConfig::from_workspace(Some(temp.path().to_path_buf()), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let result = AppConfig::from_workspace(
            Some(temp.path().to_path_buf()),
            Some(temp.path().join("missing.yaml")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(CliOverrides {
            model: Some("phi".to_string()),
            verbose: true,
            log_json: true,
            ..Default::default()
        });

        assert_eq!(config.llm.model, "phi");
        assert!(config.verbose);
        assert!(config.log_json);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_env_overrides_yaml_and_flags_override_env() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"
llm:
  provider: ollama
  model: mistral
  endpoint: http://ollama:11434
logging:
  level: warn
  color: true
"#,
        );

        let env: HashMap<&str, &str> = HashMap::from([
            ("COACH_PROVIDER", "Ollama"),
            ("COACH_MODEL", "phi"),
            ("COACH_ENDPOINT", "http://gpu-box:11434"),
            ("RUST_LOG", "coach=trace"),
            ("NO_COLOR", "1"),
        ]);

        let mut config = AppConfig::from_workspace(Some(temp.path().to_path_buf()), None).unwrap();
        assert_eq!(config.llm.model, "mistral");
        assert!(!config.no_color);

        config.apply_env(|key| env.get(key).map(|value| value.to_string()));
        assert_eq!(config.llm.provider, "Ollama");
        assert_eq!(config.llm.model, "phi");
        assert_eq!(config.llm.endpoint, "http://gpu-box:11434");
        assert_eq!(config.log_level.as_deref(), Some("coach=trace"));
        assert!(config.no_color);

        let config = config.with_overrides(CliOverrides {
            provider: Some("ollama".to_string()),
            model: Some("llama3".to_string()),
            log_level: Some("info".to_string()),
            ..Default::default()
        });
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.llm.endpoint, "http://gpu-box:11434");
    }

    #[test]
    fn test_unset_env_leaves_config_alone() {
        let mut config = AppConfig::default();
        config.apply_env(|_| None);
        assert_eq!(config.llm, LlmSettings::default());
        assert_eq!(config.log_level, None);
        assert!(!config.no_color);
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.llm.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_history_window() {
        let mut config = AppConfig::default();
        config.chat.history_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_default() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
