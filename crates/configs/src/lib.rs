//! # configs
//!
//! Layered runtime settings: built-in defaults, then an optional
//! `config/microblog.toml`, then `MICROBLOG__SECTION__KEY` environment
//! variables (a `.env` file is read first when present).

use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, Source};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "config/microblog";
pub const ENV_PREFIX: &str = "MICROBLOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// One JSON file per user lives here.
    pub accounts_dir: PathBuf,
    /// Served under `/images`.
    pub images_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Settings {
    /// Reads `.env`, the optional config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(
            Config::builder()
                .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
                .add_source(environment()),
        )
    }

    /// Defaults overlaid with a single explicit source.
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Self::build(Config::builder().add_source(source))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("storage.accounts_dir", "data/accounts")?
            .set_default("storage.images_dir", "images")?
            .set_default("log.filter", "info,tower_http=debug")?
            .set_default("log.format", "pretty")?
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `MICROBLOG__SERVER__PORT=9000` style variables.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_source(File::from_str("", FileFormat::Toml)).unwrap();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
        assert_eq!(settings.storage.accounts_dir, PathBuf::from("data/accounts"));
        assert_eq!(settings.storage.images_dir, PathBuf::from("images"));
        assert_eq!(settings.log.format, LogFormat::Pretty);
    }

    #[test]
    fn file_values_override_defaults() {
        let toml = r#"
            [server]
            port = 9000

            [log]
            format = "json"
        "#;
        let settings = Settings::from_source(File::from_str(toml, FileFormat::Toml)).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn environment_variables_are_nested_by_double_underscore() {
        let vars = HashMap::from([
            ("MICROBLOG__SERVER__PORT".to_owned(), "9100".to_owned()),
            (
                "MICROBLOG__STORAGE__ACCOUNTS_DIR".to_owned(),
                "/srv/blog/accounts".to_owned(),
            ),
        ]);
        let settings = Settings::from_source(environment().source(Some(vars))).unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(
            settings.storage.accounts_dir,
            PathBuf::from("/srv/blog/accounts")
        );
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let toml = "[log]\nformat = \"xml\"\n";
        assert!(Settings::from_source(File::from_str(toml, FileFormat::Toml)).is_err());
    }
}
