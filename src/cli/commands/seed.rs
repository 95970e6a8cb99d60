//! Seed command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    match store.seed_sample_alumni().await? {
        0 => println!("Directory already has records; nothing inserted."),
        n => println!("Inserted {n} sample alumni records."),
    }

    Ok(())
}
