use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;

use super::errors::IdentityError;
use super::{admin_username, ORDERER_ADMIN_USERNAME, ORDERER_STORE};
use crate::client::IssuingAuthority;
use crate::commons::config::IdentitySettings;
use crate::commons::files::read_first_file;
use crate::commons::models::identity::{CryptoContent, Identity};
use crate::database::{store_path, DatabaseCollection, DatabaseManager, UserDb};
use crate::topology::{CertificateAuthority, Organization, Topology, ORDERER_MSP_ID};

/// Resolves the admin identity of every organization and of the ordering service.
///
/// Each identity is resolved at most once per resolver: concurrent callers for the same
/// organization wait on the same cell, so an organization is never enrolled twice.
/// A failed resolution leaves the cell empty and can be attempted again.
pub struct IdentityResolver<M: DatabaseManager<C>, C: DatabaseCollection> {
    manager: Arc<M>,
    settings: IdentitySettings,
    crypto_root: PathBuf,
    domain: String,
    authority: Option<Arc<dyn IssuingAuthority>>,
    admins: HashMap<String, OnceCell<Identity>>,
    orderer_admin: OnceCell<Identity>,
    _collection: PhantomData<C>,
}

impl<M: DatabaseManager<C>, C: DatabaseCollection> IdentityResolver<M, C> {
    pub fn new(
        manager: Arc<M>,
        settings: IdentitySettings,
        topology: &Topology,
        authority: Option<Arc<dyn IssuingAuthority>>,
    ) -> Self {
        let admins = topology
            .organizations
            .iter()
            .map(|org| (org.key.clone(), OnceCell::new()))
            .collect();
        Self {
            manager,
            settings,
            crypto_root: topology.orderer.crypto_root.clone(),
            domain: topology.orderer.domain.clone(),
            authority,
            admins,
            orderer_admin: OnceCell::new(),
            _collection: PhantomData,
        }
    }

    pub async fn resolve_admin(&self, org: &Organization) -> Result<Identity, IdentityError> {
        let cell = self
            .admins
            .get(&org.key)
            .ok_or_else(|| IdentityError::UnknownOrganization(org.key.clone()))?;
        cell.get_or_try_init(|| self.load_admin(org))
            .await
            .map(Clone::clone)
            .map_err(|source| IdentityError::UserContext {
                owner: org.key.clone(),
                source: Box::new(source),
            })
    }

    pub async fn resolve_orderer_admin(&self) -> Result<Identity, IdentityError> {
        self.orderer_admin
            .get_or_try_init(|| async { self.load_orderer_admin() })
            .await
            .map(Clone::clone)
            .map_err(|source| IdentityError::UserContext {
                owner: ORDERER_STORE.to_owned(),
                source: Box::new(source),
            })
    }

    async fn load_admin(&self, org: &Organization) -> Result<Identity, IdentityError> {
        let store = self.store(&org.name);
        let username = admin_username(&org.key);
        log::debug!("Getting user context {} for MSP {}", username, org.msp.id);
        if let Some(user) = store.get_user_context(&username)? {
            if user.is_enrolled() {
                log::debug!("User {} already enrolled", username);
                return Ok(user);
            }
        }
        let org_domain = format!("{}.{}", org.key, self.domain);
        let admin_dir = self
            .crypto_root
            .join("peerOrganizations")
            .join(&org_domain)
            .join("users")
            .join(format!("Admin@{}", org_domain));
        let content = match read_crypto_content(&admin_dir) {
            Ok(content) => content,
            Err(error) => match self.enrollment_target(org) {
                Some((authority, ca, enrollment_id, secret)) => {
                    log::info!(
                        "Enrolling {} against {} at {}",
                        enrollment_id,
                        ca.name.as_deref().unwrap_or("the default CA"),
                        ca.url
                    );
                    authority
                        .enroll(ca, enrollment_id, secret)
                        .await
                        .map_err(IdentityError::Enrollment)?
                        .into()
                }
                None => return Err(error),
            },
        };
        let identity = Identity::new(username, org.msp.id.clone(), content);
        store.set_user_context(&identity)?;
        log::info!("Admin of {} resolved as {}", org.key, identity.username);
        Ok(identity)
    }

    fn load_orderer_admin(&self) -> Result<Identity, IdentityError> {
        let store = self.store(ORDERER_STORE);
        if let Some(user) = store.get_user_context(ORDERER_ADMIN_USERNAME)? {
            if user.is_enrolled() {
                return Ok(user);
            }
        }
        let admin_dir = self
            .crypto_root
            .join("ordererOrganizations")
            .join(&self.domain)
            .join("users")
            .join(format!("Admin@{}", self.domain));
        let identity = Identity::new(
            ORDERER_ADMIN_USERNAME.to_owned(),
            ORDERER_MSP_ID.to_owned(),
            read_crypto_content(&admin_dir)?,
        );
        store.set_user_context(&identity)?;
        log::info!("Orderer admin resolved");
        Ok(identity)
    }

    fn store(&self, name: &str) -> UserDb<C> {
        UserDb::new(
            self.manager
                .create_collection(&store_path(&self.settings.kvs_base, name)),
        )
    }

    fn enrollment_target<'a>(
        &'a self,
        org: &'a Organization,
    ) -> Option<(
        &'a Arc<dyn IssuingAuthority>,
        &'a CertificateAuthority,
        &'a str,
        &'a str,
    )> {
        Some((
            self.authority.as_ref()?,
            org.ca.as_ref()?,
            self.settings.enrollment_id.as_deref()?,
            self.settings.enrollment_secret.as_deref()?,
        ))
    }
}

fn read_crypto_content(admin_dir: &Path) -> Result<CryptoContent, IdentityError> {
    let read = |dir: PathBuf| {
        read_first_file(&dir).map_err(|source| IdentityError::MissingMaterial { path: dir, source })
    };
    Ok(CryptoContent {
        private_key_pem: read(admin_dir.join("keystore"))?,
        signed_cert_pem: read(admin_dir.join("signcerts"))?,
    })
}
