mod errors;
mod resolver;

pub use errors::IdentityError;
pub use resolver::IdentityResolver;

/// Username under which the admin of an organization is stored.
pub fn admin_username(org_key: &str) -> String {
    format!("peer{}Admin", org_key)
}

pub const ORDERER_ADMIN_USERNAME: &str = "ordererAdmin";
/// Store of the orderer admin, appended to the key/value base path.
pub const ORDERER_STORE: &str = "orderer";
