pub mod channel;
pub mod event;
pub mod identity;
pub mod transaction;
