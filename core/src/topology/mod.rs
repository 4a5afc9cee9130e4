//! Static description of the network turned into connection targets and trust material.
//!
//! The orderer entry is mandatory. Organizations are the network entries whose key
//! starts with `org`, and inside an organization the peers are the entries whose key
//! starts with `peer`. Both are kept in natural order of their numeric suffix, so `org2`
//! comes before `org10`. Any transport trust root that cannot be read aborts the load:
//! nothing can be contacted without it.
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::commons::config::{NetworkSettings, OrdererSettings, OrganizationSettings, PeerSettings};
use crate::commons::files::{read_all_files, read_pem};

const ORGANIZATION_PREFIX: &str = "org";
const PEER_PREFIX: &str = "peer";
pub const ORDERER_MSP_ID: &str = "OrdererMSP";

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("No orderer defined in the network settings")]
    MissingOrderer,
    #[error("No organization defined in the network settings")]
    NoOrganizations,
    #[error("Organization {org} has no peers")]
    NoPeers { org: String },
    #[error("Invalid entry {key}: {reason}")]
    InvalidEntry { key: String, reason: String },
    #[error("Invalid url {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Trust material {path} could not be read")]
    TrustMaterial {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Endpoint plus the TLS root used to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub url: Url,
    pub server_hostname: String,
    pub tls_root: String,
}

/// Trust domain of an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MspConfig {
    pub id: String,
    pub root_certs: Vec<Vec<u8>>,
    pub admin_certs: Vec<Vec<u8>>,
}

/// Issuing authority enrolling the admin of an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateAuthority {
    pub url: Url,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PeerNode {
    pub key: String,
    pub requests: ConnectionTarget,
    pub events: Option<ConnectionTarget>,
}

#[derive(Debug, Clone)]
pub struct Organization {
    /// Key of the organization in the network settings, e.g. `org1`
    pub key: String,
    /// Name used for its state store, e.g. `peerOrg1`
    pub name: String,
    pub msp: MspConfig,
    pub peers: Vec<PeerNode>,
    pub ca: Option<CertificateAuthority>,
}

#[derive(Debug, Clone)]
pub struct OrdererNode {
    pub target: ConnectionTarget,
    pub domain: String,
    pub crypto_root: PathBuf,
    pub configtx: Option<PathBuf>,
    pub msp: Option<MspConfig>,
}

#[derive(Debug, Clone)]
pub struct Topology {
    pub orderer: OrdererNode,
    pub organizations: Vec<Organization>,
}

impl Topology {
    pub fn load(settings: &NetworkSettings) -> Result<Self, TopologyError> {
        let orderer = load_orderer(
            settings
                .orderer
                .as_ref()
                .ok_or(TopologyError::MissingOrderer)?,
        )?;
        let mut organizations = Vec::new();
        for (key, value) in settings.entries.iter() {
            if !key.starts_with(ORGANIZATION_PREFIX) {
                log::debug!("Skipping network entry {}", key);
                continue;
            }
            let org_settings: OrganizationSettings = serde_json::from_value(value.clone())
                .map_err(|e| TopologyError::InvalidEntry {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
            organizations.push(load_organization(key, &org_settings)?);
        }
        if organizations.is_empty() {
            return Err(TopologyError::NoOrganizations);
        }
        organizations.sort_by(|a, b| natural_order(&a.key).cmp(&natural_order(&b.key)));
        log::info!(
            "Topology loaded: {} organizations, orderer at {}",
            organizations.len(),
            orderer.target.url
        );
        Ok(Self {
            orderer,
            organizations,
        })
    }

    pub fn organization(&self, key: &str) -> Option<&Organization> {
        self.organizations.iter().find(|org| org.key == key)
    }

    /// Every trust domain known to the network, orderer included when configured.
    pub fn msps(&self) -> Vec<&MspConfig> {
        let mut msps: Vec<&MspConfig> = self.organizations.iter().map(|org| &org.msp).collect();
        if let Some(msp) = self.orderer.msp.as_ref() {
            msps.push(msp);
        }
        msps
    }
}

fn load_orderer(settings: &OrdererSettings) -> Result<OrdererNode, TopologyError> {
    let target = connection_target(
        &settings.url,
        &settings.server_hostname,
        &settings.tls_cacerts,
    )?;
    let msp = match (&settings.msp_id, &settings.msp_dir) {
        (Some(id), Some(dir)) => Some(load_msp(id, Path::new(dir))?),
        _ => None,
    };
    Ok(OrdererNode {
        target,
        domain: settings.domain.clone(),
        crypto_root: PathBuf::from(&settings.crypto_root_dir),
        configtx: settings.configtx.as_ref().map(PathBuf::from),
        msp,
    })
}

fn load_organization(
    key: &str,
    settings: &OrganizationSettings,
) -> Result<Organization, TopologyError> {
    let mut peers = Vec::new();
    for (peer_key, value) in settings.entries.iter() {
        if !peer_key.starts_with(PEER_PREFIX) {
            continue;
        }
        let peer: PeerSettings =
            serde_json::from_value(value.clone()).map_err(|e| TopologyError::InvalidEntry {
                key: format!("{}.{}", key, peer_key),
                reason: e.to_string(),
            })?;
        let requests = connection_target(&peer.requests, &peer.server_hostname, &peer.tls_cacerts)?;
        let events = match peer.events.as_ref() {
            Some(events) => Some(ConnectionTarget {
                url: parse_url(events)?,
                ..requests.clone()
            }),
            None => None,
        };
        peers.push(PeerNode {
            key: peer_key.clone(),
            requests,
            events,
        });
    }
    if peers.is_empty() {
        return Err(TopologyError::NoPeers { org: key.to_owned() });
    }
    peers.sort_by(|a, b| natural_order(&a.key).cmp(&natural_order(&b.key)));
    let ca = match settings.ca.as_ref() {
        Some(ca) => Some(CertificateAuthority {
            url: parse_url(&ca.url)?,
            name: ca.name.clone(),
        }),
        None => None,
    };
    Ok(Organization {
        key: key.to_owned(),
        name: settings.name.clone(),
        msp: load_msp(&settings.msp_id, Path::new(&settings.msp_dir))?,
        peers,
        ca,
    })
}

/// Sort key of a network entry. Keys without a numeric suffix go last, by name.
fn natural_order(key: &str) -> (u64, &str) {
    let suffix = key.trim_start_matches(|c: char| !c.is_ascii_digit());
    (suffix.parse().unwrap_or(u64::MAX), key)
}

fn load_msp(id: &str, dir: &Path) -> Result<MspConfig, TopologyError> {
    Ok(MspConfig {
        id: id.to_owned(),
        root_certs: read_trust_dir(&dir.join("cacerts"))?,
        admin_certs: read_trust_dir(&dir.join("admincerts"))?,
    })
}

fn read_trust_dir(dir: &Path) -> Result<Vec<Vec<u8>>, TopologyError> {
    read_all_files(dir).map_err(|source| TopologyError::TrustMaterial {
        path: dir.to_path_buf(),
        source,
    })
}

fn connection_target(
    url: &str,
    server_hostname: &str,
    tls_cacerts: &str,
) -> Result<ConnectionTarget, TopologyError> {
    let path = Path::new(tls_cacerts);
    let tls_root = read_pem(path).map_err(|source| TopologyError::TrustMaterial {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ConnectionTarget {
        url: parse_url(url)?,
        server_hostname: server_hostname.to_owned(),
        tls_root,
    })
}

fn parse_url(url: &str) -> Result<Url, TopologyError> {
    Url::parse(url).map_err(|source| TopologyError::InvalidUrl {
        url: url.to_owned(),
        source,
    })
}
