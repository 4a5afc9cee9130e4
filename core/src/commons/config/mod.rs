use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "LEDGER_ADMIN";

/// Configuration parameters of an administration session divided into categories.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminSettings {
    pub network: NetworkSettings,
    #[serde(default)]
    pub identity: IdentitySettings,
    #[serde(default)]
    pub session: SessionSettings,
}

/// Static description of the network: the ordering service plus every
/// organization. Organizations are the entries whose key starts with `org`;
/// anything else is ignored by the topology loader.
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkSettings {
    pub orderer: Option<OrdererSettings>,
    #[serde(flatten)]
    pub entries: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrdererSettings {
    pub url: String,
    #[serde(rename = "server-hostname")]
    pub server_hostname: String,
    /// PEM file with the TLS root of the orderer
    pub tls_cacerts: String,
    pub domain: String,
    /// Root of the generated crypto material (`peerOrganizations`, `ordererOrganizations`)
    #[serde(rename = "cryptorootdir")]
    pub crypto_root_dir: String,
    /// Pre-built channel configuration transaction
    pub configtx: Option<String>,
    #[serde(rename = "mspid")]
    pub msp_id: Option<String>,
    #[serde(rename = "mspdir")]
    pub msp_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrganizationSettings {
    pub name: String,
    #[serde(rename = "mspid")]
    pub msp_id: String,
    #[serde(rename = "mspdir")]
    pub msp_dir: String,
    pub ca: Option<CaSettings>,
    /// Peers are the entries whose key starts with `peer`
    #[serde(flatten)]
    pub entries: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaSettings {
    pub url: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PeerSettings {
    /// Endpoint receiving proposals
    pub requests: String,
    /// Endpoint of the event hub
    pub events: Option<String>,
    #[serde(rename = "server-hostname")]
    pub server_hostname: String,
    pub tls_cacerts: String,
}

/// Parameters of the identity resolver.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySettings {
    /// Base path of the per-organization key/value stores (`<base>_<org>`)
    #[serde(rename = "kvs_base")]
    pub kvs_base: String,
    /// Credentials used against the issuing authority when no material is on disk
    pub enrollment_id: Option<String>,
    pub enrollment_secret: Option<String>,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            kvs_base: "/tmp/hfc-test-kvs".into(),
            enrollment_id: None,
            enrollment_secret: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Time given to the ordering service to propagate a new channel
    pub grace_period_ms: u64,
    /// Bound applied to every commit confirmation
    pub event_timeout_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            grace_period_ms: 5000,
            event_timeout_ms: 30000,
        }
    }
}

impl AdminSettings {
    /// Loads the settings from a TOML file, overridden by `LEDGER_ADMIN__*` variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Loads the settings from an in-memory TOML document.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
