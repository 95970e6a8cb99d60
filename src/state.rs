use anyhow::Context;
use std::sync::Arc;
use tower_sessions_sqlx_store::SqliteStore;

use crate::clients::llm::{LlmClient, TextGenerator};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AlumniService, AssistantService, AuthService, DefaultAssistantService, SeaOrmAlumniService,
    SeaOrmAuthService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub alumni_service: Arc<dyn AlumniService>,

    pub auth_service: Arc<dyn AuthService>,

    pub assistant: Arc<dyn AssistantService>,

    /// Login sessions, kept in the same database as the directory.
    pub sessions: SqliteStore,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let generator = Arc::new(LlmClient::new(&config.llm)?);
        Self::with_generator(config, generator).await
    }

    /// Builds the state around an arbitrary text generator, so tests can run
    /// the AI routes without a network.
    pub async fn with_generator(
        config: Config,
        generator: Arc<dyn TextGenerator>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        store.bootstrap_admin(&config.security).await?;

        let sessions = SqliteStore::new(store.conn.get_sqlite_connection_pool().clone());
        sessions
            .migrate()
            .await
            .context("Failed to create session table")?;

        let alumni_service =
            Arc::new(SeaOrmAlumniService::new(store.clone())) as Arc<dyn AlumniService>;
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;
        let assistant = Arc::new(DefaultAssistantService::new(
            store.clone(),
            generator,
            &config.llm,
        )) as Arc<dyn AssistantService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            alumni_service,
            auth_service,
            assistant,
            sessions,
        })
    }
}
