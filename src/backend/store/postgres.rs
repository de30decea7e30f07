//! Postgres-backed state store
//!
//! Documents are rows with a JSONB payload: `user_app_states` and
//! `user_profiles` keyed by user id, `chat_messages` keyed by match id.
//! Profile saves use JSONB concatenation for merge semantics; state saves
//! replace the payload whole. `updated_at` is stamped server-side.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{StateStore, StoreError};
use crate::shared::types::{ChatMessage, ProfilePatch, UserAppState, UserProfile};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for PostgresStore {
    async fn get_state(&self, user_id: Uuid) -> Result<Option<UserAppState>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT state, updated_at FROM user_app_states WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let value: serde_json::Value = row.get("state");
                let mut state: UserAppState = serde_json::from_value(value)?;
                let updated_at: DateTime<Utc> = row.get("updated_at");
                state.updated_at = Some(updated_at);
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn save_state(&self, user_id: Uuid, state: &UserAppState) -> Result<(), StoreError> {
        let payload = serde_json::to_value(state)?;
        sqlx::query(
            r#"
            INSERT INTO user_app_states (user_id, state, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id) DO UPDATE SET state = EXCLUDED.state, updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT profile FROM user_profiles WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let value: serde_json::Value = row.get("profile");
                Ok(Some(serde_json::from_value(value)?))
            }
            None => Ok(None),
        }
    }

    async fn save_profile(&self, user_id: Uuid, patch: &ProfilePatch) -> Result<(), StoreError> {
        // Seed document for first save; the JSONB || merge applies the patch
        // on top of whatever is already stored.
        let blank = serde_json::to_value(UserProfile::blank(user_id))?;
        let patch = serde_json::to_value(patch)?;
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, profile, updated_at)
            VALUES ($1, $2 || $3, now())
            ON CONFLICT (user_id)
            DO UPDATE SET profile = user_profiles.profile || $3, updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(blank)
        .bind(patch)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn sample_states(
        &self,
        exclude: Uuid,
        cap: usize,
    ) -> Result<Vec<(Uuid, UserAppState)>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, state FROM user_app_states WHERE user_id <> $1 LIMIT $2
            "#,
        )
        .bind(exclude)
        .bind(cap as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut sample = Vec::with_capacity(rows.len());
        for row in rows {
            let user_id: Uuid = row.get("user_id");
            let value: serde_json::Value = row.get("state");
            sample.push((user_id, serde_json::from_value(value)?));
        }
        Ok(sample)
    }

    async fn append_message(
        &self,
        match_id: Uuid,
        message: &ChatMessage,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, match_id, sender_id, text, sender_avatar, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(match_id)
        .bind(message.sender_id)
        .bind(&message.text)
        .bind(&message.sender_avatar)
        .bind(message.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn messages(&self, match_id: Uuid) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, text, sender_avatar, sent_at
            FROM chat_messages
            WHERE match_id = $1
            ORDER BY sent_at ASC
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ChatMessage {
                id: row.get("id"),
                sender_id: row.get("sender_id"),
                text: row.get("text"),
                sender_avatar: row.get("sender_avatar"),
                timestamp: row.get("sent_at"),
            })
            .collect())
    }
}
