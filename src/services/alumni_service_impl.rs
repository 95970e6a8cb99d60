//! `SeaORM` implementation of the `AlumniService` trait.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::db::Store;
use crate::models::alumni::{AlumniInput, AlumniRecord};
use crate::services::alumni_service::{AlumniError, AlumniService};

pub struct SeaOrmAlumniService {
    store: Store,
}

impl SeaOrmAlumniService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate(input: AlumniInput) -> Result<AlumniInput, AlumniError> {
        let input = input.trimmed();

        if input.name.is_empty() {
            return Err(AlumniError::Validation("name is required".to_string()));
        }
        if input.age.is_some_and(|age| age < 0) {
            return Err(AlumniError::Validation("age cannot be negative".to_string()));
        }

        Ok(input)
    }
}

#[async_trait]
impl AlumniService for SeaOrmAlumniService {
    async fn list(&self, keyword: Option<&str>) -> Result<Vec<AlumniRecord>, AlumniError> {
        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        Ok(self.store.list_alumni(keyword).await?)
    }

    async fn get(&self, id: i32) -> Result<AlumniRecord, AlumniError> {
        self.store
            .get_alumni(id)
            .await?
            .ok_or(AlumniError::NotFound(id))
    }

    async fn create(&self, input: AlumniInput) -> Result<i32, AlumniError> {
        let input = Self::validate(input)?;
        let id = self.store.create_alumni(&input).await?;
        info!(id, name = %input.name, "Created alumni record");
        Ok(id)
    }

    async fn update(&self, id: i32, input: AlumniInput) -> Result<(), AlumniError> {
        let input = Self::validate(input)?;

        if self.store.update_alumni(id, &input).await? {
            info!(id, "Updated alumni record");
            Ok(())
        } else {
            Err(AlumniError::NotFound(id))
        }
    }

    async fn delete(&self, id: i32) -> Result<(), AlumniError> {
        if self.store.delete_alumni(id).await? {
            info!(id, "Deleted alumni record");
        } else {
            debug!(id, "Delete of missing alumni record ignored");
        }
        Ok(())
    }
}
