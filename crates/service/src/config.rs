use std::collections::HashMap;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dotenvy::dotenv;
use url::Url;

use common::graph::{DriveSelection, SiteLocator, DEFAULT_GRAPH_BASE_URL};
use common::identity::{Credentials, DEFAULT_AUTHORITY_HOST};
use common::storage::{ConnectionString, ConnectionStringError};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:7071";

/// Keys that must be present for a sync to succeed. Their absence is
/// reported but does not stop the service from starting.
pub const REQUIRED_KEYS: [&str; 9] = [
    "TENANT_ID",
    "CLIENT_ID",
    "CLIENT_SECRET",
    "SHAREPOINT_SITE",
    "SITE_PATH",
    "LIST_NAME",
    "WEBHOOK_CLIENT_STATE",
    "STORAGE_CONNECTION_STRING",
    "CONTAINER_NAME",
];

#[derive(Debug, Clone)]
pub struct Config {
    // identity
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Base of the token endpoint, `{authority}/{tenant}/oauth2/v2.0/token`
    pub authority_host: Url,

    // document library
    /// e.g. `contoso.sharepoint.com`
    pub sharepoint_site: Option<String>,
    /// e.g. `/sites/legal`
    pub site_path: Option<String>,
    pub list_name: Option<String>,
    pub library_match: DriveSelection,
    pub graph_base_url: Url,

    // webhook
    /// Shared secret echoed back in every change notification
    pub webhook_client_state: Option<String>,
    /// Public notification url handed to Graph when subscribing
    pub webhook_url: Option<Url>,
    /// If set, `/api/sync` requires this key
    pub sync_api_key: Option<String>,

    // blob storage
    pub storage_connection_string: Option<String>,
    pub container_name: Option<String>,

    // http server
    pub listen_addr: SocketAddr,

    // misc
    pub log_level: tracing::Level,

    // noticed while loading, logged by `report` once a subscriber exists
    source: ConfigSource,
    invalid_log_level: Option<String>,
}

/// Where a [`Config`] was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Process environment, with the `.env` file that was applied if any
    Env { dotenv: Option<PathBuf> },
    SettingsFile(PathBuf),
    Lookup,
}

impl Config {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Config, ConfigError> {
        let dotenv = dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        Ok(Config {
            source: ConfigSource::Env { dotenv },
            ..config
        })
    }

    /// Load from the `Values` map of a `local.settings.json` file.
    pub fn from_settings_file(path: &Path) -> Result<Config, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let settings: serde_json::Value = serde_json::from_str(&raw)?;
        let values = settings
            .get("Values")
            .and_then(|values| values.as_object())
            .ok_or(ConfigError::MissingValues)?;

        let values: HashMap<String, String> = values
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect();

        let config = Self::from_lookup(|key| values.get(key).cloned())?;
        Ok(Config {
            source: ConfigSource::SettingsFile(path.to_path_buf()),
            ..config
        })
    }

    /// Build a config from any key/value source. Empty values count as
    /// unset. Malformed optional values are errors; missing required
    /// values are not (see [`Config::missing_required`]).
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let authority_host = match get("AUTHORITY_HOST") {
            Some(url) => Url::parse(&url)?,
            None => Url::parse(DEFAULT_AUTHORITY_HOST)?,
        };
        let graph_base_url = match get("GRAPH_BASE_URL") {
            Some(url) => Url::parse(&url)?,
            None => Url::parse(DEFAULT_GRAPH_BASE_URL)?,
        };
        let webhook_url = get("WEBHOOK_URL").map(|url| Url::parse(&url)).transpose()?;

        let library_match = match get("LIBRARY_MATCH") {
            Some(selection) => {
                DriveSelection::from_str(&selection).map_err(ConfigError::LibraryMatch)?
            }
            None => DriveSelection::default(),
        };

        let listen_addr_str = get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr_str.parse()?;

        let raw_log_level = get("LOG_LEVEL");
        let log_level = raw_log_level
            .as_deref()
            .and_then(|level| tracing::Level::from_str(level).ok())
            .unwrap_or(tracing::Level::INFO);
        let invalid_log_level =
            raw_log_level.filter(|level| tracing::Level::from_str(level).is_err());

        Ok(Config {
            tenant_id: get("TENANT_ID"),
            client_id: get("CLIENT_ID"),
            client_secret: get("CLIENT_SECRET"),
            authority_host,
            sharepoint_site: get("SHAREPOINT_SITE"),
            site_path: get("SITE_PATH"),
            list_name: get("LIST_NAME"),
            library_match,
            graph_base_url,
            webhook_client_state: get("WEBHOOK_CLIENT_STATE"),
            webhook_url,
            sync_api_key: get("SYNC_API_KEY"),
            storage_connection_string: get("STORAGE_CONNECTION_STRING"),
            container_name: get("CONTAINER_NAME"),
            listen_addr,
            log_level,
            source: ConfigSource::Lookup,
            invalid_log_level,
        })
    }

    /// Required keys with no value.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let values = [
            &self.tenant_id,
            &self.client_id,
            &self.client_secret,
            &self.sharepoint_site,
            &self.site_path,
            &self.list_name,
            &self.webhook_client_state,
            &self.storage_connection_string,
            &self.container_name,
        ];
        REQUIRED_KEYS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Log what loading noticed: the source, a bad `LOG_LEVEL` and every
    /// missing required key. Loading runs before logging is installed, so
    /// call this after `init_logging`.
    pub fn report(&self) {
        match &self.source {
            ConfigSource::Env { dotenv: Some(path) } => {
                tracing::debug!("Loaded environment from {}", path.display())
            }
            ConfigSource::Env { dotenv: None } => tracing::debug!("No .env file found"),
            ConfigSource::SettingsFile(path) => {
                tracing::debug!("Loaded settings from {}", path.display())
            }
            ConfigSource::Lookup => {}
        }
        if let Some(level) = &self.invalid_log_level {
            tracing::warn!("Invalid LOG_LEVEL {}. Using default", level);
        }
        self.report_missing();
    }

    pub fn report_missing(&self) {
        for key in self.missing_required() {
            tracing::error!("Environment variable {} is MISSING!", key);
        }
    }

    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        match (&self.tenant_id, &self.client_id, &self.client_secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Ok(Credentials {
                tenant_id: tenant_id.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    pub fn site_locator(&self) -> Result<SiteLocator, ConfigError> {
        Ok(SiteLocator {
            host: required(&self.sharepoint_site, "SHAREPOINT_SITE")?.to_string(),
            path: required(&self.site_path, "SITE_PATH")?.to_string(),
            library: required(&self.list_name, "LIST_NAME")?.to_string(),
        })
    }

    /// The storage account and container uploads go to.
    pub fn blob_target(&self) -> Result<(ConnectionString, &str), ConfigError> {
        let connection_string =
            required(&self.storage_connection_string, "STORAGE_CONNECTION_STRING")?.parse()?;
        let container = required(&self.container_name, "CONTAINER_NAME")?;
        Ok((connection_string, container))
    }

    pub fn client_state(&self) -> Result<&str, ConfigError> {
        required(&self.webhook_client_state, "WEBHOOK_CLIENT_STATE")
    }
}

fn required<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or(ConfigError::Missing(key))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing authentication credentials (TENANT_ID, CLIENT_ID, or CLIENT_SECRET)")]
    MissingCredentials,
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Invalid Socket Address: {0}")]
    ListenAddr(#[from] std::net::AddrParseError),
    #[error("Invalid LIBRARY_MATCH: {0}")]
    LibraryMatch(String),
    #[error("Invalid STORAGE_CONNECTION_STRING: {0}")]
    ConnectionString(#[from] ConnectionStringError),
    #[error("failed to read settings file: {0}")]
    SettingsIo(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    SettingsJson(#[from] serde_json::Error),
    #[error("settings file has no Values object")]
    MissingValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_keys_are_absent() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:7071".parse().unwrap());
        assert_eq!(config.authority_host.as_str(), "https://login.microsoftonline.com/");
        assert_eq!(config.graph_base_url.as_str(), "https://graph.microsoft.com/v1.0");
        assert_eq!(config.library_match, DriveSelection::ExactOrFirst);
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert!(config.sync_api_key.is_none());
        assert_eq!(config.missing_required().len(), REQUIRED_KEYS.len());
    }

    #[test]
    fn missing_credentials_error_names_all_three() {
        let config =
            Config::from_lookup(lookup(&[("TENANT_ID", "t"), ("CLIENT_ID", "c"), ("CLIENT_SECRET", "")]))
                .unwrap();
        let err = config.credentials().unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing authentication credentials (TENANT_ID, CLIENT_ID, or CLIENT_SECRET)"
        );
        assert_eq!(config.missing_required()[0], "CLIENT_SECRET");
    }

    #[test]
    fn site_locator_and_blob_target_come_from_config() {
        let config = Config::from_lookup(lookup(&[
            ("SHAREPOINT_SITE", "contoso.sharepoint.com"),
            ("SITE_PATH", "/sites/legal"),
            ("LIST_NAME", "Documents"),
            ("STORAGE_CONNECTION_STRING", "UseDevelopmentStorage=true"),
        ]))
        .unwrap();

        let locator = config.site_locator().unwrap();
        assert_eq!(locator.host, "contoso.sharepoint.com");
        assert_eq!(locator.library, "Documents");

        assert!(matches!(
            config.blob_target(),
            Err(ConfigError::Missing("CONTAINER_NAME"))
        ));
    }

    #[test]
    fn malformed_optional_values_are_rejected() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("LISTEN_ADDR", "not-an-addr")])),
            Err(ConfigError::ListenAddr(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("LIBRARY_MATCH", "closest")])),
            Err(ConfigError::LibraryMatch(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("GRAPH_BASE_URL", "::")])),
            Err(ConfigError::Url(_))
        ));
    }

    #[test]
    fn invalid_log_level_falls_back_to_info() {
        let config = Config::from_lookup(lookup(&[("LOG_LEVEL", "chatty")])).unwrap();
        assert_eq!(config.log_level, tracing::Level::INFO);
        // kept for `report`, which runs once logging is up
        assert_eq!(config.invalid_log_level.as_deref(), Some("chatty"));

        let config = Config::from_lookup(lookup(&[("LOG_LEVEL", "debug")])).unwrap();
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert!(config.invalid_log_level.is_none());
    }

    #[test]
    fn settings_file_values_are_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("local.settings.json");
        fs::write(
            &path,
            r#"{
                "IsEncrypted": false,
                "Values": {
                    "FUNCTIONS_WORKER_RUNTIME": "python",
                    "TENANT_ID": "tenant-1",
                    "LIST_NAME": "Documents",
                    "LISTEN_ADDR": "127.0.0.1:9000"
                }
            }"#,
        )
        .unwrap();

        let config = Config::from_settings_file(&path).unwrap();
        assert_eq!(config.tenant_id.as_deref(), Some("tenant-1"));
        assert_eq!(config.list_name.as_deref(), Some("Documents"));
        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.source(), &ConfigSource::SettingsFile(path.clone()));

        fs::write(&path, r#"{"IsEncrypted": false}"#).unwrap();
        assert!(matches!(
            Config::from_settings_file(&path),
            Err(ConfigError::MissingValues)
        ));
    }
}
