use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A video record as stored in the metadata database.
///
/// Created when a draft video entry is registered; the upload handlers only
/// ever read it (for the ownership check) and write the two URL fields back.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for registering a new draft video record.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVideo {
    pub user_id: Uuid,
    pub title: String,
}
