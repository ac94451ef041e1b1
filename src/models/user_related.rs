//! Users, their sessions and their interactions with documents

use super::local_timestamp;
use crate::db::{Entity, SqlValue};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registered account
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: Vec<u8>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserProfile {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_digest: impl Into<Vec<u8>>,
    ) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_digest: password_digest.into(),
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for UserProfile {
    const ENTITY: &'static str = "UserProfile";
    const TABLE: &'static str = "user_profile";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "username",
        "email",
        "password_digest",
        "first_name",
        "last_name",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("username", self.username.clone().into()),
            ("email", self.email.clone().into()),
            ("password_digest", self.password_digest.clone().into()),
            ("first_name", self.first_name.clone().into()),
            ("last_name", self.last_name.clone().into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

/// Anonymous visitor, optionally linked to an account
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InferredUser {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub origin_referrer: Option<String>,
    pub created_at: NaiveDateTime,
}

impl InferredUser {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            origin_referrer: None,
            created_at: local_timestamp(),
        }
    }
}

impl Default for InferredUser {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for InferredUser {
    const ENTITY: &'static str = "InferredUser";
    const TABLE: &'static str = "inferred_user";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "origin_referrer", "created_at"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("user_id", self.user_id.into()),
            ("origin_referrer", self.origin_referrer.clone().into()),
            ("created_at", self.created_at.into()),
        ]
    }
}

/// Browsing session of an inferred user, stored in the `session` table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserSession {
    pub id: Uuid,
    pub inferred_user_id: Uuid,
    pub created_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub host: String,
    pub origin_referrer: Option<String>,
}

impl UserSession {
    pub fn new(inferred_user_id: Uuid, host: impl Into<String>, end_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            inferred_user_id,
            created_at: local_timestamp(),
            end_at,
            host: host.into(),
            origin_referrer: None,
        }
    }
}

impl Entity for UserSession {
    const ENTITY: &'static str = "Session";
    const TABLE: &'static str = "session";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "inferred_user_id",
        "created_at",
        "end_at",
        "host",
        "origin_referrer",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("inferred_user_id", self.inferred_user_id.into()),
            ("created_at", self.created_at.into()),
            ("end_at", self.end_at.into()),
            ("host", self.host.clone().into()),
            ("origin_referrer", self.origin_referrer.clone().into()),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: Uuid,
    pub document_id: Uuid,
    pub inferred_user_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Bookmark {
    pub fn new(document_id: Uuid, inferred_user_id: Uuid) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            document_id,
            inferred_user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Bookmark {
    const ENTITY: &'static str = "Bookmark";
    const TABLE: &'static str = "bookmark";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "document_id",
        "inferred_user_id",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("document_id", self.document_id.into()),
            ("inferred_user_id", self.inferred_user_id.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

/// One message of a chat conversation
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub inferred_user_id: Uuid,
    pub conversation_id: Uuid,
    pub role: String,
    pub textual_content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ChatMessage {
    pub fn new(
        inferred_user_id: Uuid,
        conversation_id: Uuid,
        role: impl Into<String>,
        textual_content: impl Into<String>,
    ) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            inferred_user_id,
            conversation_id,
            role: role.into(),
            textual_content: textual_content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for ChatMessage {
    const ENTITY: &'static str = "ChatMessage";
    const TABLE: &'static str = "chat_message";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "inferred_user_id",
        "conversation_id",
        "role",
        "textual_content",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("inferred_user_id", self.inferred_user_id.into()),
            ("conversation_id", self.conversation_id.into()),
            ("role", self.role.clone().into()),
            ("textual_content", self.textual_content.clone().into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

/// Document cited in a chat answer
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReturnedDocument {
    pub id: Uuid,
    pub message_id: Uuid,
    pub document_id: Uuid,
    pub is_clicked: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ReturnedDocument {
    pub fn new(message_id: Uuid, document_id: Uuid) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            message_id,
            document_id,
            is_clicked: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for ReturnedDocument {
    const ENTITY: &'static str = "ReturnedDocument";
    const TABLE: &'static str = "returned_document";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "message_id",
        "document_id",
        "is_clicked",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("message_id", self.message_id.into()),
            ("document_id", self.document_id.into()),
            ("is_clicked", self.is_clicked.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct APIKeyManagement {
    pub id: Uuid,
    pub title: Option<String>,
    pub register_email: String,
    #[serde(skip_serializing)]
    pub digest: Vec<u8>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl APIKeyManagement {
    pub fn new(register_email: impl Into<String>, digest: impl Into<Vec<u8>>) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            title: None,
            register_email: register_email.into(),
            digest: digest.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for APIKeyManagement {
    const ENTITY: &'static str = "APIKeyManagement";
    const TABLE: &'static str = "api_key_management";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "register_email",
        "digest",
        "is_active",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("title", self.title.clone().into()),
            ("register_email", self.register_email.clone().into()),
            ("digest", self.digest.clone().into()),
            ("is_active", self.is_active.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DataCollectionCampaignManagement {
    pub id: Uuid,
    pub is_active: bool,
    pub end_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl DataCollectionCampaignManagement {
    pub fn new(end_at: NaiveDateTime) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            is_active: true,
            end_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Active and not yet over at `now`
    pub fn is_running(&self, now: NaiveDateTime) -> bool {
        self.is_active && now < self.end_at
    }
}

impl Entity for DataCollectionCampaignManagement {
    const ENTITY: &'static str = "DataCollectionCampaignManagement";
    const TABLE: &'static str = "data_collection_campaign_management";
    const COLUMNS: &'static [&'static str] =
        &["id", "is_active", "end_at", "created_at", "updated_at"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("is_active", self.is_active.into()),
            ("end_at", self.end_at.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

/// API call made during a session
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EndpointRequest {
    pub id: Uuid,
    pub session_id: Uuid,
    pub endpoint_name: String,
    pub http_code: Option<i64>,
    pub message: Option<String>,
    pub created_at: NaiveDateTime,
}

impl EndpointRequest {
    pub fn new(session_id: Uuid, endpoint_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            endpoint_name: endpoint_name.into(),
            http_code: None,
            message: None,
            created_at: local_timestamp(),
        }
    }
}

impl Entity for EndpointRequest {
    const ENTITY: &'static str = "EndpointRequest";
    const TABLE: &'static str = "endpoint_request";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "session_id",
        "endpoint_name",
        "http_code",
        "message",
        "created_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("session_id", self.session_id.into()),
            ("endpoint_name", self.endpoint_name.clone().into()),
            ("http_code", self.http_code.into()),
            ("message", self.message.clone().into()),
            ("created_at", self.created_at.into()),
        ]
    }
}
