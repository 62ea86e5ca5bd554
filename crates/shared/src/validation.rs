//! Common validation utilities for game-state fields.

use validator::ValidationError;

/// Maximum character level.
const MAX_LEVEL: i32 = 20;

/// Maximum number of conditions a character can carry at once.
const MAX_CONDITIONS: usize = 16;

/// Maximum length of a single condition name.
const MAX_CONDITION_LEN: usize = 40;

/// Validates that a character level is within range (1 to 20).
pub fn validate_level(level: i32) -> Result<(), ValidationError> {
    if (1..=MAX_LEVEL).contains(&level) {
        Ok(())
    } else {
        let mut err = ValidationError::new("level_range");
        err.message = Some("Level must be between 1 and 20".into());
        Err(err)
    }
}

/// Validates that a hit-point value is non-negative.
pub fn validate_hit_points(hp: i32) -> Result<(), ValidationError> {
    if hp >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("hp_range");
        err.message = Some("Hit points must be non-negative".into());
        Err(err)
    }
}

/// Validates that an experience-point value is non-negative.
pub fn validate_experience(xp: i32) -> Result<(), ValidationError> {
    if xp >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("xp_range");
        err.message = Some("Experience points must be non-negative".into());
        Err(err)
    }
}

/// Validates a list of condition names (e.g. "poisoned", "stunned").
pub fn validate_conditions(conditions: &[String]) -> Result<(), ValidationError> {
    if conditions.len() > MAX_CONDITIONS {
        let mut err = ValidationError::new("too_many_conditions");
        err.message = Some("A character can carry at most 16 conditions".into());
        return Err(err);
    }
    for condition in conditions {
        if condition.trim().is_empty() || condition.len() > MAX_CONDITION_LEN {
            let mut err = ValidationError::new("condition_name");
            err.message = Some("Condition names must be 1-40 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Validates that a downtime duration is within range (1 to 365 days).
pub fn validate_downtime_days(days: i32) -> Result<(), ValidationError> {
    if (1..=365).contains(&days) {
        Ok(())
    } else {
        let mut err = ValidationError::new("downtime_days_range");
        err.message = Some("Downtime days must be between 1 and 365".into());
        Err(err)
    }
}
