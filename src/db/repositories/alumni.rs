use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::{alumni, prelude::*};
use crate::models::alumni::{AlumniInput, AlumniRecord};

/// Columns matched by keyword search, OR-ed together.
const SEARCH_COLUMNS: [alumni::Column; 7] = [
    alumni::Column::Name,
    alumni::Column::Phone,
    alumni::Column::Email,
    alumni::Column::Major,
    alumni::Column::City,
    alumni::Column::Country,
    alumni::Column::Bio,
];

/// Repository for the alumni record table
pub struct AlumniRepository {
    conn: DatabaseConnection,
}

impl AlumniRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: alumni::Model) -> AlumniRecord {
        AlumniRecord {
            id: m.id,
            name: m.name,
            gender: m.gender,
            age: m.age,
            phone: m.phone,
            email: m.email,
            grad_year: m.grad_year,
            degree: m.degree,
            major: m.major,
            city: m.city,
            country: m.country,
            bio: m.bio,
        }
    }

    fn keyword_condition(keyword: &str) -> Condition {
        SEARCH_COLUMNS
            .iter()
            .fold(Condition::any(), |cond, column| {
                cond.add(column.contains(keyword))
            })
    }

    fn active_model(input: &AlumniInput, now: &str) -> alumni::ActiveModel {
        alumni::ActiveModel {
            name: Set(input.name.clone()),
            gender: Set(input.gender.clone()),
            age: Set(input.age),
            phone: Set(input.phone.clone()),
            email: Set(input.email.clone()),
            grad_year: Set(input.grad_year),
            degree: Set(input.degree.clone()),
            major: Set(input.major.clone()),
            city: Set(input.city.clone()),
            country: Set(input.country.clone()),
            bio: Set(input.bio.clone()),
            updated_at: Set(now.to_string()),
            ..Default::default()
        }
    }

    /// Lists rows ascending by id, optionally filtered by a substring keyword.
    pub async fn list(&self, keyword: Option<&str>) -> Result<Vec<AlumniRecord>> {
        let mut query = Alumni::find();
        if let Some(keyword) = keyword {
            query = query.filter(Self::keyword_condition(keyword));
        }

        let rows = query
            .order_by_asc(alumni::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list alumni")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Keyword search capped at `limit` rows.
    pub async fn search(&self, keyword: &str, limit: u64) -> Result<Vec<AlumniRecord>> {
        let rows = Alumni::find()
            .filter(Self::keyword_condition(keyword))
            .order_by_asc(alumni::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to search alumni")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<AlumniRecord>> {
        let row = Alumni::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query alumni by ID")?;

        Ok(row.map(Self::map_model))
    }

    pub async fn create(&self, input: &AlumniInput) -> Result<i32> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut active = Self::active_model(input, &now);
        active.created_at = Set(now);

        let res = Alumni::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert alumni")?;

        Ok(res.last_insert_id)
    }

    /// Overwrites every mutable column. Returns `false` when no row has this id.
    pub async fn update(&self, id: i32, input: &AlumniInput) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = Alumni::update_many()
            .set(Self::active_model(input, &now))
            .filter(alumni::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update alumni")?;

        Ok(result.rows_affected > 0)
    }

    /// Returns whether a row was actually removed.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Alumni::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete alumni")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Alumni::find()
            .count(&self.conn)
            .await
            .context("Failed to count alumni")
    }
}
