use mongodb::Database;
use tracing::info;

use crate::config::BootstrapConfig;
use crate::database::models::{User, UserInput};
use crate::database::{DatabaseError, DatabaseManager, Repository};

/// Create the configured admin account unless one with that email exists.
///
/// Returns `true` when an account was created. Nothing happens unless both
/// `ADMIN_EMAIL` and `ADMIN_PASSWORD` are set.
pub async fn seed_admin(users: &Repository<User>, bootstrap: &BootstrapConfig) -> Result<bool, DatabaseError> {
    let (Some(email), Some(password)) = (&bootstrap.admin_email, &bootstrap.admin_password) else {
        return Ok(false);
    };

    if users.find_by_email(email).await?.is_some() {
        info!("Admin account {} already present", email);
        return Ok(false);
    }

    users
        .create(UserInput {
            email: email.clone(),
            password: password.clone(),
        })
        .await?;

    info!("Seeded admin account {}", email);
    Ok(true)
}

/// Startup work that needs a reachable database: unique indexes, then the
/// admin account.
pub async fn prepare_database(
    database: &Database,
    users: &Repository<User>,
    bootstrap: &BootstrapConfig,
) -> Result<(), DatabaseError> {
    DatabaseManager::ensure_indexes(database).await?;

    seed_admin(users, bootstrap).await?;
    Ok(())
}
