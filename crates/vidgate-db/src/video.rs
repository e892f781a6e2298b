//! Video record repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vidgate_core::models::{NewVideo, Video};
use vidgate_core::AppError;

/// Narrow contract the upload pipeline has with the metadata store.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create_video(&self, new_video: NewVideo) -> Result<Video, AppError>;
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;
    async fn list_videos(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create_video(&self, new_video: NewVideo) -> Result<Video, AppError> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (id, user_id, title)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, thumbnail_url, video_url, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_video.user_id)
        .bind(&new_video.title)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(video_id = %video.id, user_id = %video.user_id, "Created video record");
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, thumbnail_url, video_url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    async fn list_videos(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let videos = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, thumbnail_url, video_url, created_at, updated_at
            FROM videos
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET thumbnail_url = $2, video_url = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }

        Ok(())
    }
}
