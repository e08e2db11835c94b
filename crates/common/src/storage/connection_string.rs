use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::Url;

/// Well-known Azurite / storage emulator account.
pub const DEVELOPMENT_ACCOUNT_NAME: &str = "devstoreaccount1";
pub const DEVELOPMENT_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
pub const DEVELOPMENT_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

#[derive(Clone, PartialEq, Eq)]
pub enum StorageAuth {
    /// Account name and decoded account key.
    SharedKey { account: String, key: Vec<u8> },
    /// SAS token without the leading `?`.
    Sas(String),
}

impl fmt::Debug for StorageAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageAuth::SharedKey { account, .. } => f
                .debug_struct("SharedKey")
                .field("account", account)
                .field("key", &"<redacted>")
                .finish(),
            StorageAuth::Sas(_) => f.write_str("Sas(<redacted>)"),
        }
    }
}

/// A parsed Azure storage connection string, reduced to what blob
/// uploads need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub blob_endpoint: Url,
    pub auth: StorageAuth,
}

impl FromStr for ConnectionString {
    type Err = ConnectionStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut settings = HashMap::new();
        for segment in s.split(';').map(str::trim).filter(|seg| !seg.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConnectionStringError::Malformed(key_of(segment)))?;
            settings.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
        if settings.is_empty() {
            return Err(ConnectionStringError::Empty);
        }

        let development = settings
            .get("usedevelopmentstorage")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if development {
            return Ok(Self {
                blob_endpoint: Url::parse(DEVELOPMENT_BLOB_ENDPOINT)?,
                auth: StorageAuth::SharedKey {
                    account: DEVELOPMENT_ACCOUNT_NAME.to_string(),
                    key: decode_key(DEVELOPMENT_ACCOUNT_KEY)?,
                },
            });
        }

        let account = settings.get("accountname").cloned();

        let blob_endpoint = match settings.get("blobendpoint") {
            Some(endpoint) => Url::parse(endpoint)?,
            None => {
                let account = account
                    .as_deref()
                    .ok_or(ConnectionStringError::MissingAccountName)?;
                let protocol = settings
                    .get("defaultendpointsprotocol")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL);
                let suffix = settings
                    .get("endpointsuffix")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_ENDPOINT_SUFFIX);
                Url::parse(&format!("{}://{}.blob.{}", protocol, account, suffix))?
            }
        };

        let auth = if let Some(sas) = settings.get("sharedaccesssignature") {
            StorageAuth::Sas(sas.trim_start_matches('?').to_string())
        } else {
            match (account, settings.get("accountkey")) {
                (Some(account), Some(key)) => StorageAuth::SharedKey {
                    account,
                    key: decode_key(key)?,
                },
                (None, Some(_)) => return Err(ConnectionStringError::MissingAccountName),
                _ => return Err(ConnectionStringError::MissingCredentials),
            }
        };

        Ok(Self {
            blob_endpoint,
            auth,
        })
    }
}

// never echo a whole segment back, it may hold a key
fn key_of(segment: &str) -> String {
    segment.chars().take(24).collect()
}

fn decode_key(key: &str) -> Result<Vec<u8>, ConnectionStringError> {
    STANDARD
        .decode(key)
        .map_err(|_| ConnectionStringError::InvalidAccountKey)
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionStringError {
    #[error("connection string is empty")]
    Empty,
    #[error("malformed connection string segment starting with '{0}'")]
    Malformed(String),
    #[error("connection string has no AccountName")]
    MissingAccountName,
    #[error("connection string has neither AccountKey nor SharedAccessSignature")]
    MissingCredentials,
    #[error("AccountKey is not valid base64")]
    InvalidAccountKey,
    #[error("invalid blob endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}
