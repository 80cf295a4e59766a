//! 配置加载
//!
//! 优先级：`--config` > `./dns-migrator.toml` > `/etc/dns-migrator/config.toml` > 默认值。
//! 凭证环境变量优先于配置文件，命令行参数最后覆盖。

use std::path::{Path, PathBuf};

use dns_migrator_core::{BindZoneOptions, CoreError};
use dns_migrator_provider::{ProviderCredentials, ProviderType};
use serde::{Deserialize, Serialize};

pub const LOCAL_CONFIG_PATH: &str = "dns-migrator.toml";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/dns-migrator/config.toml";

pub const ENV_ACCESS_KEY_ID: &str = "HUAWEICLOUD_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "HUAWEICLOUD_SECRET_ACCESS_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// What a command needs from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// BIND zone file rendering.
    Bind,
    /// Anything talking to the provider API.
    Provider,
}

/// Values given on the command line, applied after the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// tinydns `data` file.
    pub data_path: PathBuf,
    pub logging: LoggingConfig,
    pub bind: BindConfig,
    pub provider: ProviderConfig,
    pub sync: SyncConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("/etc/tinydns/root/data"),
            logging: LoggingConfig::default(),
            bind: BindConfig::default(),
            provider: ProviderConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `dns_migrator_provider=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Zones to render, one file each.
    pub zones: Vec<String>,
    pub output_dir: PathBuf,
    pub name_servers: Vec<String>,
    pub hostmaster: Option<String>,
    pub default_ttl: u32,
}

impl Default for BindConfig {
    fn default() -> Self {
        let options = BindZoneOptions::default();
        Self {
            zones: Vec::new(),
            output_dir: PathBuf::from("."),
            name_servers: options.name_servers,
            hostmaster: options.hostmaster,
            default_ttl: options.default_ttl,
        }
    }
}

impl BindConfig {
    pub fn renderer_options(&self) -> BindZoneOptions {
        BindZoneOptions {
            name_servers: self.name_servers.clone(),
            hostmaster: self.hostmaster.clone(),
            default_ttl: self.default_ttl,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderType,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Retries of transient HTTP failures inside the provider client.
    pub max_retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderType::Huaweicloud,
            access_key_id: None,
            secret_access_key: None,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Change batches in flight at once.
    pub concurrency: usize,
    /// Log existing record sets before importing.
    pub show_existing: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            show_existing: false,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dns-migrator.toml in current directory
    /// 3. /etc/dns-migrator/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&Path>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(Path::new(LOCAL_CONFIG_PATH))?
        } else if Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(Path::new(SYSTEM_CONFIG_PATH))?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.apply_cli_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.display().to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 环境变量中的凭证覆盖配置文件
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_ACCESS_KEY_ID).filter(|v| !v.is_empty()) {
            self.provider.access_key_id = Some(key);
        }
        if let Some(secret) = lookup(ENV_SECRET_ACCESS_KEY).filter(|v| !v.is_empty()) {
            self.provider.secret_access_key = Some(secret);
        }
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(path) = overrides.data_path {
            self.data_path = path;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self, target: Target) -> Result<(), ConfigError> {
        match target {
            Target::Bind => {
                if self.bind.zones.is_empty() {
                    return Err(ConfigError::Validation(
                        "No zones configured for BIND output".to_string(),
                    ));
                }
                self.bind
                    .renderer_options()
                    .validate()
                    .map_err(|e| match e {
                        CoreError::Validation(message) => ConfigError::Validation(message),
                        other => ConfigError::Validation(other.to_string()),
                    })?;
            }
            Target::Provider => {
                if self.sync.concurrency == 0 {
                    return Err(ConfigError::Validation(
                        "Sync concurrency cannot be 0".to_string(),
                    ));
                }
                self.credentials()?;
            }
        }
        Ok(())
    }

    /// Provider credentials assembled from the `[provider]` section.
    pub fn credentials(&self) -> Result<ProviderCredentials, ConfigError> {
        let missing = |name: &str, env: &str| {
            ConfigError::Validation(format!(
                "Missing provider credential '{name}' (set it in [provider] or {env})"
            ))
        };
        let access_key_id = self
            .provider
            .access_key_id
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| missing("access_key_id", ENV_ACCESS_KEY_ID))?;
        let secret_access_key = self
            .provider
            .secret_access_key
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| missing("secret_access_key", ENV_SECRET_ACCESS_KEY))?;

        match self.provider.kind {
            ProviderType::Huaweicloud => Ok(ProviderCredentials::Huaweicloud {
                access_key_id,
                secret_access_key,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.data_path, PathBuf::from("/etc/tinydns/root/data"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.bind.name_servers,
            ["ns1.artofliving.org", "ns2.artofliving.org"]
        );
        assert_eq!(config.bind.default_ttl, 3600);
        assert_eq!(config.provider.max_retries, 2);
        assert_eq!(config.sync.concurrency, 1);
        assert!(!config.sync.show_existing);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(
            r#"
data_path = "/srv/tinydns/data"

[bind]
zones = ["artofliving.org", "srisriravishankar.org"]
output_dir = "/var/named"

[sync]
concurrency = 4
"#,
        );
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/tinydns/data"));
        assert_eq!(config.bind.zones.len(), 2);
        assert_eq!(config.bind.output_dir, PathBuf::from("/var/named"));
        assert_eq!(config.bind.default_ttl, 3600);
        assert_eq!(config.sync.concurrency, 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let file = write_config("[bind\nzones = 1");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load(Some(missing.as_path()), CliOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(..)));
    }

    #[test]
    fn env_credentials_take_precedence() {
        let file = write_config(
            r#"
[provider]
kind = "huaweicloud"
access_key_id = "file-ak"
secret_access_key = "file-sk"
"#,
        );
        let mut config = Config::from_file(file.path()).unwrap();
        config.apply_env(|key| match key {
            ENV_ACCESS_KEY_ID => Some("env-ak".to_string()),
            ENV_SECRET_ACCESS_KEY => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.provider.access_key_id.as_deref(), Some("env-ak"));
        assert_eq!(config.provider.secret_access_key.as_deref(), Some("file-sk"));
    }

    #[test]
    fn cli_overrides_win() {
        let file = write_config("data_path = \"/from/file\"\n[logging]\nlevel = \"warn\"\n");
        let config = Config::load(
            Some(file.path()),
            CliOverrides {
                data_path: Some(PathBuf::from("/from/cli")),
                log_level: Some("debug".to_string()),
            },
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/from/cli"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn validation() {
        let mut config = Config::default();
        assert!(matches!(
            config.validate(Target::Bind),
            Err(ConfigError::Validation(_))
        ));
        config.bind.zones = vec!["example.org".to_string()];
        assert!(config.validate(Target::Bind).is_ok());
        config.bind.name_servers = vec!["ns1.example.org".to_string(), " ".to_string()];
        assert!(matches!(
            config.validate(Target::Bind),
            Err(ConfigError::Validation(message)) if message == "Name server #2 is empty"
        ));
        config.bind.name_servers = BindZoneOptions::default().name_servers;

        assert!(config.validate(Target::Provider).is_err());
        config.provider.access_key_id = Some("ak".to_string());
        config.provider.secret_access_key = Some("sk".to_string());
        assert!(config.validate(Target::Provider).is_ok());

        config.sync.concurrency = 0;
        assert!(config.validate(Target::Provider).is_err());
    }

    #[test]
    fn renderer_options_follow_bind_section() {
        let mut config = Config::default();
        config.bind.hostmaster = Some("dns-admin.example.org".to_string());
        config.bind.default_ttl = 600;
        let options = config.bind.renderer_options();
        assert_eq!(options.hostmaster.as_deref(), Some("dns-admin.example.org"));
        assert_eq!(options.default_ttl, 600);
        assert_eq!(options.name_servers, config.bind.name_servers);
    }
}
