use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")] // Sensor family, e.g. "ESP32"
    #[sea_orm(column_name = "type")]
    pub device_type: String,
    pub description: Option<String>,
    // Exposed on purpose: the owner needs it to configure the physical device
    #[sea_orm(unique)]
    pub api_key: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::telemetry::Entity")]
    Telemetry,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::telemetry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Telemetry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
