//! User account entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Sex {
    #[sea_orm(string_value = "W")]
    #[serde(rename = "W")]
    Woman,

    #[sea_orm(string_value = "M")]
    #[serde(rename = "M")]
    Man,
}

impl Sex {
    /// Parse the single-letter code used in forms and workbooks; blank means unset
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "W" | "w" => Some(Sex::Woman),
            "M" | "m" => Some(Sex::Man),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// PHC-formatted argon2 hash
    #[serde(skip_serializing)]
    pub password: String,

    pub email: String,

    pub first_name: String,

    pub last_name: String,

    pub is_staff: bool,

    pub is_superuser: bool,

    pub is_active: bool,

    pub sex: Option<Sex>,

    /// Profile photo path relative to the media root
    pub photo: Option<String>,

    /// Icon path relative to the media root, derived from the photo
    pub icon: Option<String>,

    pub date_joined: DateTimeWithTimeZone,
}

impl Model {
    /// First and last name, or the username when both are blank
    pub fn full_name(&self) -> String {
        if self.first_name.is_empty() && self.last_name.is_empty() {
            return self.username.clone();
        }
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Last name followed by the first-name initial, e.g. "Nowak A."
    pub fn short_name(&self) -> String {
        let initial = self
            .first_name
            .chars()
            .next()
            .map(|c| format!("{}.", c))
            .unwrap_or_default();

        if initial.is_empty() && self.last_name.is_empty() {
            return self.username.clone();
        }
        format!("{} {}", self.last_name, initial).trim().to_string()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::employee::Entity")]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
