//! PostgreSQL implementation of ConversationStore.
//!
//! Persists Conversation aggregates to PostgreSQL. Scalar fields live in
//! typed columns; the message transcript, feedback trail, flags, and the
//! derived metrics/rating snapshots are stored as JSONB documents.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE conversations (
//!     id              UUID PRIMARY KEY,
//!     vendor_id       UUID NOT NULL,
//!     customer_id     UUID,
//!     channel         TEXT NOT NULL,
//!     status          TEXT NOT NULL,
//!     tags            JSONB NOT NULL,
//!     messages        JSONB NOT NULL,
//!     metrics         JSONB NOT NULL,
//!     feedback        JSONB NOT NULL,
//!     rating          JSONB NOT NULL,
//!     flags           JSONB NOT NULL,
//!     created_at      TIMESTAMPTZ NOT NULL,
//!     updated_at      TIMESTAMPTZ NOT NULL,
//!     last_message_at TIMESTAMPTZ
//! );
//! CREATE INDEX conversations_vendor_activity_idx
//!     ON conversations (vendor_id, COALESCE(last_message_at, created_at) DESC);
//! ```

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::conversation::{Channel, Conversation, ConversationStatus};
use crate::domain::foundation::{ConversationId, CustomerId, Timestamp, VendorId};
use crate::ports::{
    ConversationFilter, ConversationStore, ConversationStoreError, ConversationSummary, Page,
};

/// PostgreSQL implementation of ConversationStore.
#[derive(Clone)]
pub struct PostgresConversationStore {
    pool: PgPool,
}

impl PostgresConversationStore {
    /// Creates a new PostgresConversationStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationStoreError> {
        let tags = to_jsonb(conversation.tags())?;
        let messages = to_jsonb(conversation.messages())?;
        let metrics = to_jsonb(conversation.metrics())?;
        let feedback = to_jsonb(conversation.feedback())?;
        let rating = to_jsonb(conversation.rating())?;
        let flags = to_jsonb(conversation.flags())?;

        sqlx::query(
            r#"
            INSERT INTO conversations (
                id, vendor_id, customer_id, channel, status, tags,
                messages, metrics, feedback, rating, flags,
                created_at, updated_at, last_message_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                customer_id = EXCLUDED.customer_id,
                channel = EXCLUDED.channel,
                status = EXCLUDED.status,
                tags = EXCLUDED.tags,
                messages = EXCLUDED.messages,
                metrics = EXCLUDED.metrics,
                feedback = EXCLUDED.feedback,
                rating = EXCLUDED.rating,
                flags = EXCLUDED.flags,
                updated_at = EXCLUDED.updated_at,
                last_message_at = EXCLUDED.last_message_at
            "#,
        )
        .bind(conversation.id().as_uuid())
        .bind(conversation.vendor_id().as_uuid())
        .bind(conversation.customer_id().map(|c| *c.as_uuid()))
        .bind(conversation.channel().as_str())
        .bind(conversation.status().as_str())
        .bind(tags)
        .bind(messages)
        .bind(metrics)
        .bind(feedback)
        .bind(rating)
        .bind(flags)
        .bind(conversation.created_at().as_datetime())
        .bind(conversation.updated_at().as_datetime())
        .bind(conversation.last_message_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            ConversationStoreError::storage(format!("Failed to save conversation: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, ConversationStoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, vendor_id, customer_id, channel, status, tags,
                   messages, metrics, feedback, rating, flags,
                   created_at, updated_at, last_message_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            ConversationStoreError::storage(format!("Failed to fetch conversation: {}", e))
        })?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let id_uuid: uuid::Uuid = row.get("id");
        let vendor_uuid: uuid::Uuid = row.get("vendor_id");
        let customer_uuid: Option<uuid::Uuid> = row.get("customer_id");
        let channel: String = row.get("channel");
        let status: String = row.get("status");
        let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
        let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");
        let last_message_at: Option<chrono::DateTime<chrono::Utc>> = row.get("last_message_at");

        let conversation = Conversation::reconstitute(
            ConversationId::from_uuid(id_uuid),
            VendorId::from_uuid(vendor_uuid),
            customer_uuid.map(CustomerId::from_uuid),
            Channel::parse(&channel),
            str_to_status(&status)?,
            from_jsonb(row.get("tags"), "tags")?,
            from_jsonb(row.get("messages"), "messages")?,
            from_jsonb(row.get("metrics"), "metrics")?,
            from_jsonb(row.get("feedback"), "feedback")?,
            from_jsonb(row.get("rating"), "rating")?,
            from_jsonb(row.get("flags"), "flags")?,
            Timestamp::from_datetime(created_at),
            Timestamp::from_datetime(updated_at),
            last_message_at.map(Timestamp::from_datetime),
        );

        Ok(Some(conversation))
    }

    async fn list_for_vendor(
        &self,
        vendor_id: &VendorId,
        filter: &ConversationFilter,
    ) -> Result<Page<ConversationSummary>, ConversationStoreError> {
        let status = filter.status.map(|s| s.as_str());
        let channel = filter.channel.map(|c| c.as_str());

        let total_row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total
            FROM conversations
            WHERE vendor_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR channel = $3)
              AND ($4::text IS NULL OR tags @> to_jsonb($4::text))
            "#,
        )
        .bind(vendor_id.as_uuid())
        .bind(status)
        .bind(channel)
        .bind(filter.tag.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            ConversationStoreError::storage(format!("Failed to count conversations: {}", e))
        })?;

        let total: i64 = total_row.get("total");

        let rows = sqlx::query(
            r#"
            SELECT id, vendor_id, channel, status, tags,
                   (metrics->>'total')::bigint AS message_count,
                   (rating->>'average')::float8 AS rating_average,
                   (rating->>'count')::bigint AS rating_count,
                   (SELECT COUNT(*)
                    FROM jsonb_array_elements(flags) AS f
                    WHERE f->>'status' IN ('open', 'in_review')) AS open_flag_count,
                   last_message_at, created_at
            FROM conversations
            WHERE vendor_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR channel = $3)
              AND ($4::text IS NULL OR tags @> to_jsonb($4::text))
            ORDER BY COALESCE(last_message_at, created_at) DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(vendor_id.as_uuid())
        .bind(status)
        .bind(channel)
        .bind(filter.tag.as_deref())
        .bind(i64::from(filter.limit))
        .bind(i64::from(filter.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            ConversationStoreError::storage(format!("Failed to list conversations: {}", e))
        })?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let id_uuid: uuid::Uuid = row.get("id");
            let vendor_uuid: uuid::Uuid = row.get("vendor_id");
            let channel: String = row.get("channel");
            let status: String = row.get("status");
            let message_count: i64 = row.get("message_count");
            let rating_average: f64 = row.get("rating_average");
            let rating_count: i64 = row.get("rating_count");
            let open_flag_count: i64 = row.get("open_flag_count");
            let last_message_at: Option<chrono::DateTime<chrono::Utc>> =
                row.get("last_message_at");
            let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

            items.push(ConversationSummary {
                id: ConversationId::from_uuid(id_uuid),
                vendor_id: VendorId::from_uuid(vendor_uuid),
                channel: Channel::parse(&channel),
                status: str_to_status(&status)?,
                tags: from_jsonb(row.get("tags"), "tags")?,
                message_count: message_count as u64,
                rating_average,
                rating_count: rating_count as u64,
                open_flag_count: open_flag_count as u64,
                last_message_at: last_message_at.map(Timestamp::from_datetime),
                created_at: Timestamp::from_datetime(created_at),
            });
        }

        Ok(Page::new(items, total as u64))
    }
}

// === Helper Functions ===

fn to_jsonb<T: serde::Serialize>(value: T) -> Result<serde_json::Value, ConversationStoreError> {
    serde_json::to_value(value).map_err(|e| {
        ConversationStoreError::serialization(format!("Failed to serialize column: {}", e))
    })
}

fn from_jsonb<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    column: &str,
) -> Result<T, ConversationStoreError> {
    serde_json::from_value(value).map_err(|e| {
        ConversationStoreError::serialization(format!("Failed to read column {}: {}", column, e))
    })
}

fn str_to_status(s: &str) -> Result<ConversationStatus, ConversationStoreError> {
    match s {
        "active" => Ok(ConversationStatus::Active),
        "closed" => Ok(ConversationStatus::Closed),
        "archived" => Ok(ConversationStatus::Archived),
        _ => Err(ConversationStoreError::serialization(format!(
            "Invalid conversation status: {}",
            s
        ))),
    }
}
