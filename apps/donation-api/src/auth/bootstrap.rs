//! First-run seeding of the default admin account.

use chrono::Utc;

use crate::auth::password::hash_password;
use crate::db::store::Store;
use crate::error::ApiError;
use crate::models::admin::NewAdmin;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";

/// Create the `admin` account if it does not exist yet.
///
/// Returns `true` when a new account was created.
pub async fn ensure_default_admin(store: &dyn Store, password: &str) -> Result<bool, ApiError> {
    if store.find_admin(DEFAULT_ADMIN_USERNAME).await?.is_some() {
        tracing::info!("default admin already exists");
        return Ok(false);
    }

    store
        .insert_admin(NewAdmin {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            password_hash: hash_password(password)?,
            is_active: true,
            created_at: Utc::now(),
        })
        .await?;

    tracing::warn!(
        username = DEFAULT_ADMIN_USERNAME,
        "default admin created; change its password"
    );
    Ok(true)
}
