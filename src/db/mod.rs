use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::models::account::{Account, Role};
use crate::models::alumni::{AlumniInput, AlumniRecord};

pub mod migrator;
pub mod repositories;

pub use repositories::account::{CreateAccount, hash_password};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn alumni_repo(&self) -> repositories::alumni::AlumniRepository {
        repositories::alumni::AlumniRepository::new(self.conn.clone())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Alumni records
    // ========================================================================

    pub async fn list_alumni(&self, keyword: Option<&str>) -> Result<Vec<AlumniRecord>> {
        self.alumni_repo().list(keyword).await
    }

    pub async fn search_alumni(&self, keyword: &str, limit: u64) -> Result<Vec<AlumniRecord>> {
        self.alumni_repo().search(keyword, limit).await
    }

    pub async fn get_alumni(&self, id: i32) -> Result<Option<AlumniRecord>> {
        self.alumni_repo().get(id).await
    }

    pub async fn create_alumni(&self, input: &AlumniInput) -> Result<i32> {
        self.alumni_repo().create(input).await
    }

    pub async fn update_alumni(&self, id: i32, input: &AlumniInput) -> Result<bool> {
        self.alumni_repo().update(id, input).await
    }

    pub async fn delete_alumni(&self, id: i32) -> Result<bool> {
        self.alumni_repo().delete(id).await
    }

    pub async fn alumni_count(&self) -> Result<u64> {
        self.alumni_repo().count().await
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    pub async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.account_repo().get_by_username(username).await
    }

    pub async fn get_account_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(Account, String)>> {
        self.account_repo()
            .get_by_username_with_password(username)
            .await
    }

    pub async fn get_account(&self, id: i32) -> Result<Option<Account>> {
        self.account_repo().get_by_id(id).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.account_repo().list_all().await
    }

    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<CreateAccount> {
        self.account_repo()
            .create(username, password, role, security)
            .await
    }

    pub async fn verify_account_password(&self, password_hash: String, password: &str) -> Result<bool> {
        repositories::account::AccountRepository::verify_password(password_hash, password).await
    }

    pub async fn set_account_active(&self, id: i32, is_active: bool) -> Result<bool> {
        self.account_repo().set_active(id, is_active).await
    }

    pub async fn touch_last_login(&self, id: i32) -> Result<()> {
        self.account_repo().touch_last_login(id).await
    }

    pub async fn delete_account(&self, id: i32) -> Result<bool> {
        self.account_repo().delete(id).await
    }

    /// Creates the configured admin account when no admin exists yet.
    /// Returns `true` if an account was created.
    pub async fn bootstrap_admin(&self, security: &SecurityConfig) -> Result<bool> {
        if self.account_repo().count_admins().await? > 0 {
            return Ok(false);
        }

        let username = &security.bootstrap_admin_username;
        match self
            .create_account(
                username,
                &security.bootstrap_admin_password,
                Role::Admin,
                security,
            )
            .await?
        {
            CreateAccount::Created(id) => {
                warn!(
                    "Bootstrapped admin account '{username}' (id {id}); change its password before exposing the service"
                );
                Ok(true)
            }
            CreateAccount::UsernameTaken => {
                warn!("Cannot bootstrap admin: username '{username}' is taken by a non-admin account");
                Ok(false)
            }
        }
    }

    /// Inserts the demo rows when the alumni table is empty.
    /// Returns the number of rows inserted.
    pub async fn seed_sample_alumni(&self) -> Result<usize> {
        if self.alumni_count().await? > 0 {
            return Ok(0);
        }

        let samples = sample_alumni();
        for input in &samples {
            self.create_alumni(input).await?;
        }

        info!("Inserted {} sample alumni records", samples.len());
        Ok(samples.len())
    }
}

fn sample_alumni() -> Vec<AlumniInput> {
    #[allow(clippy::too_many_arguments)]
    fn row(
        name: &str,
        gender: &str,
        age: i32,
        phone: &str,
        email: &str,
        grad_year: i32,
        degree: &str,
        major: &str,
        city: &str,
        country: &str,
        bio: &str,
    ) -> AlumniInput {
        AlumniInput {
            name: name.to_string(),
            gender: Some(gender.to_string()),
            age: Some(age),
            phone: Some(phone.to_string()),
            email: Some(email.to_string()),
            grad_year: Some(grad_year),
            degree: Some(degree.to_string()),
            major: Some(major.to_string()),
            city: Some(city.to_string()),
            country: Some(country.to_string()),
            bio: Some(bio.to_string()),
        }
    }

    vec![
        row(
            "张三", "男", 30, "13800000001", "zhangsan@example.com", 2017, "硕士", "计算机科学",
            "北京", "中国", "后端工程师，分布式存储方向",
        ),
        row(
            "李四", "女", 29, "13800000002", "lisi@example.com", 2018, "本科", "通信工程", "上海",
            "中国", "运营商网络优化，5G 项目",
        ),
        row(
            "王五", "男", 28, "13800000003", "wangwu@example.com", 2019, "硕士", "人工智能", "深圳",
            "中国", "算法工程师，NLP/LLM",
        ),
        row(
            "Lucy", "女", 31, "13800000004", "lucy@example.com", 2016, "硕士", "软件工程",
            "New York", "USA", "全栈开发，React/Flask",
        ),
    ]
}
