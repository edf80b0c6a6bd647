pub mod bootstrap;

pub use bootstrap::{prepare_database, seed_admin};
