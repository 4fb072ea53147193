//! Object storage integration.
//!
//! The upload gateway persists incoming audio under generated keys and
//! resolves a URL the transcription service can fetch the object from,
//! either a direct public location or a time-limited presigned URL.

mod upload;

pub use upload::{
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_UPLOAD_PREFIX, SIGNED_URL_TTL, StorageError, UploadGateway,
    UploadedObject,
};
