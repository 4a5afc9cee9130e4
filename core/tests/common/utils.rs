use std::sync::Arc;

use ledger_admin::{
    AdminSettings, DevNetwork, IssuingAuthority, MemoryCollection, MemoryManager, Session,
};

pub type DevSession = Session<DevNetwork, MemoryManager, MemoryCollection>;

/// Opens a session on the development network with an in-memory state store.
#[allow(dead_code)]
pub async fn open_session(settings: &AdminSettings, network: &DevNetwork) -> DevSession {
    open_session_with(settings, network, Arc::new(MemoryManager::new())).await
}

#[allow(dead_code)]
pub async fn open_session_with(
    settings: &AdminSettings,
    network: &DevNetwork,
    manager: Arc<MemoryManager>,
) -> DevSession {
    let authority: Arc<dyn IssuingAuthority> = Arc::new(network.clone());
    Session::open(
        settings.clone(),
        Arc::new(network.clone()),
        manager,
        Some(authority),
    )
    .await
    .unwrap()
}
