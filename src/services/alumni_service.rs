//! Domain service for the alumni directory.
//!
//! Wraps the record store with input validation and not-found semantics.

use thiserror::Error;

use crate::models::alumni::{AlumniInput, AlumniRecord};

#[derive(Debug, Error)]
pub enum AlumniError {
    #[error("Alumni record {0} not found")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AlumniError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait AlumniService: Send + Sync {
    /// Lists every record ordered by id, or only those matching `keyword`
    /// in any searchable column. A blank keyword lists everything.
    async fn list(&self, keyword: Option<&str>) -> Result<Vec<AlumniRecord>, AlumniError>;

    /// # Errors
    ///
    /// Returns [`AlumniError::NotFound`] if no row has this id.
    async fn get(&self, id: i32) -> Result<AlumniRecord, AlumniError>;

    /// Stores a new record and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`AlumniError::Validation`] if `name` is blank.
    async fn create(&self, input: AlumniInput) -> Result<i32, AlumniError>;

    /// Overwrites every mutable field of an existing record. Never inserts.
    async fn update(&self, id: i32, input: AlumniInput) -> Result<(), AlumniError>;

    /// Deletes a record. Deleting a missing id succeeds.
    async fn delete(&self, id: i32) -> Result<(), AlumniError>;
}
