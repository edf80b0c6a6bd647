pub mod auth;
pub mod validate;

pub use auth::AuthUser;
pub use validate::{RecordId, ValidJson};
