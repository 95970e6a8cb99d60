//! Create-admin command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthError, AuthService, SeaOrmAuthService};

pub async fn cmd_create_admin(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone());

    match auth.create_admin(username, password).await {
        Ok(user) => {
            println!("Created admin '{}' (id {})", user.username, user.id);
            Ok(())
        }
        Err(AuthError::UsernameTaken(name)) => {
            println!("Username '{name}' is already taken.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
