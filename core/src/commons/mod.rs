pub mod config;
pub(crate) mod files;
pub mod models;
