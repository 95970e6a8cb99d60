//! Init command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_init(config: &Config) -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Wrote default config.toml");
    } else {
        println!("config.toml already exists, leaving it untouched");
    }

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    if store.bootstrap_admin(&config.security).await? {
        println!(
            "Created admin account '{}' with the configured bootstrap password. Change it before going live.",
            config.security.bootstrap_admin_username
        );
    }

    println!("Database ready at {}", config.general.database_path);
    Ok(())
}
