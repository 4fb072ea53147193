//! Upload gateway: store audio bytes, hand back a fetchable URL.

use bytes::Bytes;
use http::Method;
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::ObjectStore;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};
use uuid::Uuid;

// =============================================================================
// Constants
// =============================================================================

/// Maximum accepted audio payload (50MB), matching the request body cap.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Key prefix for uploaded audio objects.
pub const DEFAULT_UPLOAD_PREFIX: &str = "uploads";

/// Lifetime of presigned GET URLs. Long enough for the transcription service
/// to fetch the object even after a long queue wait.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Fallback object name when sanitization leaves nothing usable.
const FALLBACK_FILE_NAME: &str = "audio";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Payload exceeds the configured upload cap.
    #[error("audio file of {size} bytes exceeds the {max} byte upload limit")]
    TooLarge { size: usize, max: usize },

    /// Generated key was rejected by the store's path rules.
    #[error("invalid object key: {0}")]
    InvalidKey(#[from] object_store::path::Error),

    /// The underlying store rejected the write.
    #[error("object store write failed: {0}")]
    Write(#[source] object_store::Error),

    /// Presigning failed.
    #[error("failed to presign object URL: {0}")]
    Sign(#[source] object_store::Error),

    /// Neither a public base URL nor a signing-capable store is configured.
    #[error("no fetchable URL source: configure a public base URL or a signing-capable store")]
    NoUrlSource,
}

// =============================================================================
// Upload Gateway
// =============================================================================

/// Result of one stored upload. Discarded once the owning request completes;
/// the gateway takes no cleanup responsibility for the object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub bucket: String,
    pub key: String,
    /// Direct location or time-limited signed URL, fetchable by the
    /// transcription service.
    pub url: String,
}

/// Persists uploaded audio to object storage under collision-resistant keys.
///
/// URL resolution prefers a configured public base URL (publicly readable
/// buckets); otherwise a presigned GET URL is generated per upload.
pub struct UploadGateway {
    store: Arc<dyn ObjectStore>,
    signer: Option<Arc<dyn Signer>>,
    bucket: String,
    prefix: String,
    public_base_url: Option<String>,
    max_upload_bytes: usize,
}

impl UploadGateway {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            signer: None,
            bucket: bucket.into(),
            prefix: DEFAULT_UPLOAD_PREFIX.to_string(),
            public_base_url: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Enable presigned URL generation for stores that are not publicly
    /// readable.
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Resolve URLs as `{base}/{key}` instead of presigning.
    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = Some(base_url.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, max: usize) -> Self {
        self.max_upload_bytes = max;
        self
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Store one audio payload and resolve its fetchable URL.
    pub async fn store_audio(
        &self,
        original_filename: &str,
        audio: Bytes,
    ) -> Result<UploadedObject, StorageError> {
        let size = audio.len();
        if size > self.max_upload_bytes {
            return Err(StorageError::TooLarge {
                size,
                max: self.max_upload_bytes,
            });
        }

        let key = build_object_key(&self.prefix, original_filename);
        let path = ObjectPath::parse(&key)?;

        debug!(bucket = %self.bucket, key = %key, size, "writing upload to object store");
        self.store
            .put(&path, audio.into())
            .await
            .map_err(StorageError::Write)?;

        let url = self.fetchable_url(&path, &key).await?;

        info!(bucket = %self.bucket, key = %key, size, "audio upload stored");
        Ok(UploadedObject {
            bucket: self.bucket.clone(),
            key,
            url,
        })
    }

    async fn fetchable_url(&self, path: &ObjectPath, key: &str) -> Result<String, StorageError> {
        if let Some(base) = &self.public_base_url {
            return Ok(format!("{}/{}", base.trim_end_matches('/'), key));
        }

        if let Some(signer) = &self.signer {
            let url = signer
                .signed_url(Method::GET, path, SIGNED_URL_TTL)
                .await
                .map_err(StorageError::Sign)?;
            return Ok(url.to_string());
        }

        Err(StorageError::NoUrlSource)
    }
}

/// Build an upload key: `{prefix}/{unix-ms}-{uuid8}-{sanitized-name}`.
///
/// The uuid fragment keeps concurrent uploads of identically named files from
/// colliding within one timestamp tick.
fn build_object_key(prefix: &str, original_filename: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let unique = Uuid::new_v4().simple().to_string();
    let name = sanitize_filename(original_filename);

    let normalized_prefix = prefix.trim().trim_matches('/');
    if normalized_prefix.is_empty() {
        format!("{}-{}-{}", timestamp, &unique[..8], name)
    } else {
        format!("{}/{}-{}-{}", normalized_prefix, timestamp, &unique[..8], name)
    }
}

/// Reduce a client-supplied filename to a portable object name.
///
/// Keeps only `[a-z0-9._-]`: lowercases, maps whitespace runs to a single
/// hyphen, drops everything else including path separators, and refuses
/// leading dots so keys cannot start a traversal-looking segment.
fn sanitize_filename(original: &str) -> String {
    // Only the final path segment; browsers may send full paths.
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);

    let mut sanitized = String::with_capacity(base.len());
    let mut last_was_hyphen = false;
    for c in base.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
            Some(c.to_ascii_lowercase())
        } else if c.is_whitespace() || c == '-' {
            Some('-')
        } else {
            None
        };

        if let Some(mapped) = mapped {
            if mapped == '-' {
                if !last_was_hyphen && !sanitized.is_empty() {
                    sanitized.push('-');
                }
                last_was_hyphen = true;
            } else {
                sanitized.push(mapped);
                last_was_hyphen = false;
            }
        }
    }

    let sanitized = sanitized.trim_matches(['-', '.']).to_string();
    if sanitized.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        sanitized
    }
}
