use sea_orm::entity::prelude::*;

pub const SETTINGS_ID: &str = "settings";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub min_nights: i32,
    pub check_in_time: String,
    pub check_out_time: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
