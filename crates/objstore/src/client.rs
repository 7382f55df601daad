use serde::Serialize;

use crate::error::ObjStoreError;

/// Size limit for the voice-notes bucket: 50 MB per file.
pub const VOICE_NOTES_SIZE_LIMIT: u64 = 50 * 1024 * 1024;

/// Desired state of a bucket. [`ObjectStore::ensure_bucket`] converges the
/// remote bucket to this, creating it first when needed.
#[derive(Debug, Clone, Serialize)]
pub struct BucketSpec {
    pub name: String,
    pub public: bool,
    pub file_size_limit: u64,
    pub allowed_mime_types: Vec<String>,
}

impl BucketSpec {
    /// The bucket audio journal entries upload into.
    pub fn voice_notes() -> Self {
        Self {
            name: "voice-notes".to_owned(),
            public: false,
            file_size_limit: VOICE_NOTES_SIZE_LIMIT,
            allowed_mime_types: vec![
                "audio/webm".to_owned(),
                "audio/mp4".to_owned(),
                "audio/mpeg".to_owned(),
                "audio/ogg".to_owned(),
                "audio/wav".to_owned(),
            ],
        }
    }
}

#[derive(Serialize)]
struct CreateBucketRequest<'a> {
    id: &'a str,
    name: &'a str,
    public: bool,
    file_size_limit: u64,
    allowed_mime_types: &'a [String],
}

#[derive(Serialize)]
struct UpdateBucketRequest<'a> {
    public: bool,
    file_size_limit: u64,
    allowed_mime_types: &'a [String],
}

/// Client for a Supabase-storage-style bucket API.
pub struct ObjectStore {
    client: reqwest::Client,
    service_key: String,
    base_url: String,
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("service_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ObjectStore {
    /// Build from `WEMANAGE_STORAGE_URL` and `WEMANAGE_STORAGE_KEY`.
    /// `None` when either is missing; uploads are simply off then.
    pub fn from_env() -> Result<Option<Self>, ObjStoreError> {
        let (Ok(base_url), Ok(service_key)) =
            (std::env::var("WEMANAGE_STORAGE_URL"), std::env::var("WEMANAGE_STORAGE_KEY"))
        else {
            tracing::info!("object storage not configured, audio uploads disabled");
            return Ok(None);
        };
        Ok(Some(Self::new(service_key, base_url)?))
    }

    pub fn new(service_key: String, base_url: String) -> Result<Self, ObjStoreError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| ObjStoreError::ClientInit(e.to_string()))?;
        Ok(Self { client, service_key, base_url })
    }

    /// Create or update a bucket so it matches `spec`.
    ///
    /// Idempotent by contract: a bucket that already exists is success, and
    /// its size and MIME settings are converged with an update call.
    ///
    /// # Errors
    /// Returns an error on connection failure or any non-benign API status.
    pub async fn ensure_bucket(&self, spec: &BucketSpec) -> Result<(), ObjStoreError> {
        let create = CreateBucketRequest {
            id: &spec.name,
            name: &spec.name,
            public: spec.public,
            file_size_limit: spec.file_size_limit,
            allowed_mime_types: &spec.allowed_mime_types,
        };
        let response = self
            .client
            .post(format!("{}/bucket", self.base_url))
            .bearer_auth(&self.service_key)
            .json(&create)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            tracing::info!(bucket = %spec.name, "bucket created");
            return Ok(());
        }
        let body =
            response.text().await.unwrap_or_else(|_| "could not read error body".to_owned());
        if !is_already_exists(status.as_u16(), &body) {
            return Err(ObjStoreError::HttpStatus { code: status.as_u16(), body });
        }
        tracing::debug!(bucket = %spec.name, "bucket already exists, converging settings");

        let update = UpdateBucketRequest {
            public: spec.public,
            file_size_limit: spec.file_size_limit,
            allowed_mime_types: &spec.allowed_mime_types,
        };
        let response = self
            .client
            .put(format!("{}/bucket/{}", self.base_url, spec.name))
            .bearer_auth(&self.service_key)
            .json(&update)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "could not read error body".to_owned());
            return Err(ObjStoreError::HttpStatus { code: status.as_u16(), body });
        }
        tracing::info!(bucket = %spec.name, "bucket settings updated");
        Ok(())
    }
}

/// Whether a failed create means "the bucket is already there".
///
/// 409 is the documented conflict status; some API versions answer 400 with
/// a duplicate message instead, so the body is consulted as a fallback.
fn is_already_exists(status: u16, body: &str) -> bool {
    status == 409 || body.contains("already exists") || body.contains("Duplicate")
}
