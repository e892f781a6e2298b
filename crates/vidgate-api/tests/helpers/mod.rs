//! Test helpers: build AppState and router with fake collaborators.
//!
//! No database, object store, or media binaries are needed: the repository,
//! publisher, and command runner all sit behind traits, so tests swap in
//! in-memory fakes and drive the real router end to end.

use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use vidgate_api::setup::routes::build_router;
use vidgate_api::state::AppState;
use vidgate_core::models::{NewVideo, Video};
use vidgate_core::{AppError, Config};
use vidgate_db::VideoRepository;
use vidgate_processing::{CommandRunner, ProcessingError, ProcessingResult, ToolOutput};
use vidgate_storage::{AssetStore, ObjectPublisher, StorageError, StorageResult};

pub const TEST_JWT_SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const TEST_CDN_BASE: &str = "https://cdn.test";
pub const PROBE_JSON_LANDSCAPE: &str = r#"{"streams": [{"width": 1280, "height": 720}]}"#;
pub const PROBE_JSON_PORTRAIT: &str = r#"{"streams": [{"width": 1080, "height": 1920}]}"#;
pub const PROBE_JSON_AUDIO_ONLY: &str = r#"{"streams": [{"codec_type": "audio"}]}"#;

/// In-memory video repository.
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    pub fail_update: AtomicBool,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self {
            videos: Mutex::new(HashMap::new()),
            fail_update: AtomicBool::new(false),
        }
    }

    pub fn seed(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create_video(&self, new_video: NewVideo) -> Result<Video, AppError> {
        let video = make_video(new_video.user_id, &new_video.title);
        self.seed(video.clone());
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn list_videos(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        Ok(self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(AppError::Internal("update failed".to_string()));
        }
        let mut videos = self.videos.lock().unwrap();
        if !videos.contains_key(&video.id) {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }
        videos.insert(video.id, video.clone());
        Ok(())
    }
}

/// Recorded object-store put.
#[derive(Debug, Clone)]
pub struct PutRecord {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

/// Fake object publisher that records puts and can be told to fail.
pub struct FakeObjectStore {
    pub puts: Mutex<Vec<PutRecord>>,
    pub fail: AtomicBool,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn recorded_puts(&self) -> Vec<PutRecord> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectPublisher for FakeObjectStore {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("simulated outage".to_string()));
        }
        self.puts.lock().unwrap().push(PutRecord {
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: data.len(),
        });
        Ok(())
    }
}

/// Fake media tools: ffprobe answers with canned JSON, ffmpeg "remuxes" by
/// copying the input file to the requested output path.
pub struct FakeRunner {
    pub probe_json: String,
}

impl FakeRunner {
    pub fn new(probe_json: &str) -> Self {
        Self {
            probe_json: probe_json.to_string(),
        }
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[OsString]) -> ProcessingResult<ToolOutput> {
        if program.contains("ffprobe") {
            return Ok(ToolOutput {
                success: true,
                stdout: self.probe_json.clone().into_bytes(),
                stderr: Vec::new(),
            });
        }

        // ffmpeg invocation: input follows "-i", output is the last argument.
        let input_idx = args
            .iter()
            .position(|a| a == "-i")
            .map(|i| i + 1)
            .ok_or_else(|| ProcessingError::ToolInvocation("missing -i".to_string()))?;
        let input = &args[input_idx];
        let output = args
            .last()
            .ok_or_else(|| ProcessingError::ToolInvocation("missing output".to_string()))?;

        let bytes = std::fs::read(input)?;
        std::fs::write(output, bytes)?;

        Ok(ToolOutput {
            success: true,
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }
}

/// Test application with handles on every fake collaborator.
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryVideoRepository>,
    pub storage: Arc<FakeObjectStore>,
    pub assets_dir: TempDir,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn(probe_json: &str) -> Self {
        let assets_dir = TempDir::new().expect("temp assets dir");
        let config = test_config(assets_dir.path().to_str().unwrap());

        let repo = Arc::new(InMemoryVideoRepository::new());
        let storage = Arc::new(FakeObjectStore::new());
        let assets = AssetStore::new(assets_dir.path(), config.assets_base_url.clone())
            .await
            .expect("asset store");

        let state = Arc::new(AppState {
            config: config.clone(),
            videos: repo.clone(),
            object_store: storage.clone(),
            assets,
            runner: Arc::new(FakeRunner::new(probe_json)),
        });

        let router = build_router(state).expect("router");
        let server = TestServer::new(router).expect("test server");

        TestApp {
            server,
            repo,
            storage,
            assets_dir,
            config,
        }
    }

    /// Seed a video record and return it with a valid token for its owner.
    pub fn seed_video(&self) -> (Video, String) {
        let video = make_video(Uuid::new_v4(), "test clip");
        self.repo.seed(video.clone());
        let token = self.token_for(video.user_id);
        (video, token)
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        vidgate_api::auth::create_token(user_id, &self.config.jwt_secret, 1).expect("token")
    }

    pub fn video_path(&self, id: Uuid) -> String {
        format!("/videos/{}/video", id)
    }

    pub fn thumbnail_path(&self, id: Uuid) -> String {
        format!("/videos/{}/thumbnail", id)
    }
}

pub fn make_video(user_id: Uuid, title: &str) -> Video {
    let now = Utc::now();
    Video {
        id: Uuid::new_v4(),
        user_id,
        title: title.to_string(),
        thumbnail_url: None,
        video_url: None,
        created_at: now,
        updated_at: now,
    }
}

fn test_config(assets_root: &str) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: Vec::new(),
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        s3_bucket: "test-bucket".to_string(),
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        cdn_base_url: TEST_CDN_BASE.to_string(),
        assets_root: assets_root.to_string(),
        assets_base_url: "http://localhost:8091".to_string(),
        max_video_size_bytes: 1 << 20,
        max_thumbnail_size_bytes: 64 * 1024,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        tool_timeout_secs: 30,
    }
}

/// Minimal bytes that pass the MP4 signature check.
pub fn mp4_bytes() -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x20];
    data.extend_from_slice(b"ftypisom");
    data.extend_from_slice(&[0u8; 64]);
    data
}
