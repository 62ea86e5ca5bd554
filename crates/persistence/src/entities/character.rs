//! Character entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::character::Character;
use domain::models::owner::OwnerRef;

/// Database row mapping for the characters table.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterEntity {
    pub id: Uuid,
    pub name: String,
    pub class: Option<String>,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub xp: i32,
    pub conditions: Json<Vec<String>>,
    pub created_by: Option<Uuid>,
    pub owner_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CharacterEntity {
    /// The row's recorded owner fields.
    pub fn owner_ref(&self) -> OwnerRef {
        OwnerRef::from_fields(self.created_by, self.owner_email.clone())
    }
}

impl From<CharacterEntity> for Character {
    fn from(entity: CharacterEntity) -> Self {
        let owner = entity.owner_ref();
        Character {
            id: entity.id,
            name: entity.name,
            class: entity.class,
            level: entity.level,
            hp: entity.hp,
            max_hp: entity.max_hp,
            xp: entity.xp,
            conditions: entity.conditions.0,
            owner,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
