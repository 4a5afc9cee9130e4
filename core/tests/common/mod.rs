mod network_builder;
mod utils;

pub use network_builder::*;
pub use utils::*;
