use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub original_file_id: i32,
    #[sea_orm(belongs_to, from = "original_file_id", to = "id")]
    pub file: HasOne<super::file::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
