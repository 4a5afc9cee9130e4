use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::client::{ClientError, Connection, EventHub, IssuingAuthority, NetworkClient};
use crate::commons::config::AdminSettings;
use crate::commons::models::identity::Identity;
use crate::database::{DatabaseCollection, DatabaseManager};
use crate::error::Error;
use crate::identity::{IdentityError, IdentityResolver};
use crate::topology::{ConnectionTarget, Organization, Topology};

/// Everything an orchestration needs: the loaded topology, open connections to every
/// peer and to the orderer, the identity resolver and the event hubs opened so far.
///
/// A session is opened once per command and released with [`Session::close`].
pub struct Session<C, M, D>
where
    C: NetworkClient,
    M: DatabaseManager<D>,
    D: DatabaseCollection,
{
    settings: AdminSettings,
    topology: Topology,
    client: Arc<C>,
    orderer: Connection,
    peers: BTreeMap<String, Vec<Connection>>,
    identities: IdentityResolver<M, D>,
    event_hubs: Mutex<BTreeMap<String, Arc<C::Hub>>>,
}

impl<C, M, D> Session<C, M, D>
where
    C: NetworkClient,
    M: DatabaseManager<D>,
    D: DatabaseCollection,
{
    /// Loads the topology and connects to every peer and to the orderer.
    /// Missing trust material or an unreachable node aborts the session.
    pub async fn open(
        settings: AdminSettings,
        client: Arc<C>,
        manager: Arc<M>,
        authority: Option<Arc<dyn IssuingAuthority>>,
    ) -> Result<Self, Error> {
        let topology = Topology::load(&settings.network)?;
        for msp in topology.msps() {
            log::debug!(
                "Trust domain {} with {} root certificates",
                msp.id,
                msp.root_certs.len()
            );
        }
        let mut peers = BTreeMap::new();
        for org in topology.organizations.iter() {
            let mut connections = Vec::with_capacity(org.peers.len());
            for peer in org.peers.iter() {
                connections.push(connect(client.as_ref(), &peer.requests).await?);
            }
            log::info!("Connected to {} peers of {}", connections.len(), org.key);
            peers.insert(org.key.clone(), connections);
        }
        let orderer = connect(client.as_ref(), &topology.orderer.target).await?;
        let identities =
            IdentityResolver::new(manager, settings.identity.clone(), &topology, authority);
        Ok(Self {
            settings,
            topology,
            client,
            orderer,
            peers,
            identities,
            event_hubs: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn orderer(&self) -> &Connection {
        &self.orderer
    }

    /// Connections to the peers of an organization. Unknown organizations have none.
    pub fn peers(&self, org_key: &str) -> &[Connection] {
        self.peers.get(org_key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.settings.session.grace_period_ms)
    }

    pub fn event_timeout(&self) -> Duration {
        Duration::from_millis(self.settings.session.event_timeout_ms)
    }

    pub async fn resolve_admin(&self, org: &Organization) -> Result<Identity, IdentityError> {
        self.identities.resolve_admin(org).await
    }

    pub async fn resolve_orderer_admin(&self) -> Result<Identity, IdentityError> {
        self.identities.resolve_orderer_admin().await
    }

    /// Event hub of an organization, connected on first use through its first peer
    /// exposing an event source.
    pub async fn event_hub(
        &self,
        org: &Organization,
        signer: &Identity,
    ) -> Result<Arc<C::Hub>, ClientError> {
        let mut hubs = self.event_hubs.lock().await;
        if let Some(hub) = hubs.get(&org.key) {
            if hub.is_connected() {
                return Ok(hub.clone());
            }
        }
        let target = org
            .peers
            .iter()
            .find_map(|peer| peer.events.as_ref())
            .ok_or_else(|| {
                ClientError::ConnectionFailed(format!("{} has no event source", org.key))
            })?;
        let hub = Arc::new(self.client.new_event_hub(target, signer).await?);
        log::info!("Event hub of {} connected at {}", org.key, target.url);
        hubs.insert(org.key.clone(), hub.clone());
        Ok(hub)
    }

    /// Disconnects every event hub opened by the session.
    pub async fn close(self) {
        let hubs = self.event_hubs.into_inner();
        for (org, hub) in hubs.iter() {
            if hub.is_connected() {
                hub.disconnect();
                log::debug!("Event hub of {} disconnected", org);
            }
        }
        log::info!("Session closed");
    }
}

async fn connect<C: NetworkClient>(
    client: &C,
    target: &ConnectionTarget,
) -> Result<Connection, Error> {
    client
        .new_connection(target)
        .await
        .map_err(|e| Error::ConnectionError {
            target: target.url.to_string(),
            reason: e.to_string(),
        })
}
