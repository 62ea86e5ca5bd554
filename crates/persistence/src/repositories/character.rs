//! Character repository for database operations.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CharacterEntity;
use crate::metrics::QueryTimer;

/// Repository for character-related database operations.
#[derive(Clone)]
pub struct CharacterRepository {
    pool: PgPool,
}

impl CharacterRepository {
    /// Creates a new CharacterRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new character with both ownership fields recorded.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_character(
        &self,
        name: &str,
        class: Option<&str>,
        level: i32,
        hp: i32,
        max_hp: i32,
        xp: i32,
        created_by: Uuid,
        owner_email: &str,
    ) -> Result<CharacterEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_character");
        let result = sqlx::query_as::<_, CharacterEntity>(
            r#"
            INSERT INTO characters (name, class, level, hp, max_hp, xp, created_by, owner_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, class, level, hp, max_hp, xp, conditions,
                      created_by, owner_email, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(class)
        .bind(level)
        .bind(hp)
        .bind(max_hp)
        .bind(xp)
        .bind(created_by)
        .bind(owner_email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a character by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CharacterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_character_by_id");
        let result = sqlx::query_as::<_, CharacterEntity>(
            r#"
            SELECT id, name, class, level, hp, max_hp, xp, conditions,
                   created_by, owner_email, created_at, updated_at
            FROM characters
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List characters owned by a user, matching either ownership field.
    pub async fn list_owned_by(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<Vec<CharacterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_characters_owned_by");
        let result = sqlx::query_as::<_, CharacterEntity>(
            r#"
            SELECT id, name, class, level, hp, max_hp, xp, conditions,
                   created_by, owner_email, created_at, updated_at
            FROM characters
            WHERE created_by = $1 OR owner_email = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a character's core sheet fields.
    pub async fn update_character(
        &self,
        id: Uuid,
        name: &str,
        class: Option<&str>,
        level: i32,
    ) -> Result<CharacterEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_character");
        let result = sqlx::query_as::<_, CharacterEntity>(
            r#"
            UPDATE characters
            SET name = $2, class = $3, level = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, class, level, hp, max_hp, xp, conditions,
                      created_by, owner_email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(class)
        .bind(level)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Patch a character's mutable play state. None fields are left untouched.
    pub async fn update_state(
        &self,
        id: Uuid,
        hp: Option<i32>,
        max_hp: Option<i32>,
        xp: Option<i32>,
        conditions: Option<Vec<String>>,
    ) -> Result<CharacterEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_character_state");
        let result = sqlx::query_as::<_, CharacterEntity>(
            r#"
            UPDATE characters
            SET hp = COALESCE($2, hp),
                max_hp = COALESCE($3, max_hp),
                xp = COALESCE($4, xp),
                conditions = COALESCE($5, conditions),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, class, level, hp, max_hp, xp, conditions,
                      created_by, owner_email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(hp)
        .bind(max_hp)
        .bind(xp)
        .bind(conditions.map(Json))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a character. Returns the number of rows affected.
    pub async fn delete_character(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_character");
        let result = sqlx::query(
            r#"
            DELETE FROM characters
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
