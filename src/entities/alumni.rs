use sea_orm::entity::prelude::*;

/// One alumni profile row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tb_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub name: String,

    pub gender: Option<String>,

    pub age: Option<i32>,

    #[sea_orm(indexed)]
    pub phone: Option<String>,

    pub email: Option<String>,

    #[sea_orm(indexed)]
    pub grad_year: Option<i32>,

    pub degree: Option<String>,

    #[sea_orm(indexed)]
    pub major: Option<String>,

    #[sea_orm(indexed)]
    pub city: Option<String>,

    pub country: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
