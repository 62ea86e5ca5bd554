//! Character domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{
    validate_conditions, validate_experience, validate_hit_points, validate_level,
};

use super::owner::OwnerRef;

/// A player character. Owned by exactly one user, resolved through
/// [`OwnerRef`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Character {
    pub id: Uuid,
    pub name: String,
    pub class: Option<String>,
    pub level: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub xp: i32,
    pub conditions: Vec<String>,
    #[serde(flatten)]
    pub owner: OwnerRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a character.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCharacterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 50, message = "Class must be at most 50 characters"))]
    pub class: Option<String>,

    #[validate(custom(function = "validate_level"))]
    pub level: Option<i32>,

    #[validate(custom(function = "validate_hit_points"))]
    pub max_hp: Option<i32>,
}

/// Request to update a character's descriptive fields.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCharacterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    /// Explicit `null` clears the class; an absent field keeps it.
    #[validate(length(max = 50, message = "Class must be at most 50 characters"))]
    #[serde(default, deserialize_with = "super::clearable")]
    pub class: Option<Option<String>>,

    #[validate(custom(function = "validate_level"))]
    pub level: Option<i32>,
}

/// Request to update a character's game state (HP, XP, conditions).
/// Fields left out are unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCharacterStateRequest {
    #[validate(custom(function = "validate_hit_points"))]
    pub hp: Option<i32>,

    #[validate(custom(function = "validate_hit_points"))]
    pub max_hp: Option<i32>,

    #[validate(custom(function = "validate_experience"))]
    pub xp: Option<i32>,

    #[validate(custom(function = "validate_conditions"))]
    pub conditions: Option<Vec<String>>,
}
