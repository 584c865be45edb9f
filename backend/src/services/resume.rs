//! Resume upload, download and removal for seekers

use crate::error::ApiError;
use crate::repositories::UserRepository;
use crate::storage::{FileStore, StorageError};
use jobboard_shared::types::{MessageResponse, ResumeUploadResponse};
use jobboard_shared::validation::{is_allowed_resume, sanitize_filename, truncate_filename};
use sqlx::PgPool;
use std::future::Future;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Resume bytes ready to be sent back
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub async fn load(files: &dyn FileStore, path: &str) -> Result<Self, ApiError> {
        let bytes = files.read(path).await.map_err(|e| match e {
            StorageError::NotFound(_) => ApiError::NotFound("Resume not found".to_string()),
            other => other.into(),
        })?;

        let filename = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());

        Ok(Self { filename, bytes })
    }

    pub fn content_type(&self) -> &'static str {
        match self.filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
            Some(ext) if ext == "pdf" => "application/pdf",
            Some(ext) if ext == "doc" => "application/msword",
            Some(ext) if ext == "docx" => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            _ => "application/octet-stream",
        }
    }
}

/// Longest storage key handed to the file store
pub const MAX_RESUME_KEY_LEN: usize = 128;

/// Width of `users.resume_path`
const MAX_STORED_PATH_LEN: usize = 255;

/// Storage key for a user's resume, at most [`MAX_RESUME_KEY_LEN`] bytes
pub fn resume_key(user_id: Uuid, filename: &str) -> String {
    truncate_filename(
        &sanitize_filename(&format!("user_{}_{}", user_id, filename)),
        MAX_RESUME_KEY_LEN,
    )
}

/// Save `bytes` under `key`, hand the new path to `record`, and only then
/// remove `previous`
///
/// If anything after the save fails, the new file is removed again (unless
/// it landed on `previous` itself) and `previous` is left untouched.
pub async fn replace_file<F, Fut>(
    files: &dyn FileStore,
    key: &str,
    bytes: &[u8],
    previous: Option<&str>,
    record: F,
) -> Result<String, ApiError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
{
    let path = files.save(bytes, key).await?;
    let overwrote_previous = previous == Some(path.as_str());

    let recorded = if path.chars().count() > MAX_STORED_PATH_LEN {
        Err(ApiError::Internal(anyhow::anyhow!(
            "stored path '{}' exceeds {} characters",
            path,
            MAX_STORED_PATH_LEN
        )))
    } else {
        record(path.clone()).await
    };

    if let Err(e) = recorded {
        if !overwrote_previous {
            if let Err(cleanup) = files.delete(&path).await {
                warn!(path = %path, error = %cleanup, "Could not remove file from failed upload");
            }
        }
        return Err(e);
    }

    if let Some(old) = previous.filter(|_| !overwrote_previous) {
        if let Err(e) = files.delete(old).await {
            warn!(path = old, error = %e, "Could not remove previous file");
        }
    }

    Ok(path)
}

pub struct ResumeService;

impl ResumeService {
    /// Store a new resume, replacing any previous one
    pub async fn upload(
        pool: &PgPool,
        files: &dyn FileStore,
        user_id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ResumeUploadResponse, ApiError> {
        if filename.trim().is_empty() {
            return Err(ApiError::BadRequest("No selected file".to_string()));
        }
        if !is_allowed_resume(filename) {
            return Err(ApiError::BadRequest("File type not allowed".to_string()));
        }

        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let path = replace_file(
            files,
            &resume_key(user_id, filename),
            bytes,
            user.resume_path.as_deref(),
            |path| async move {
                UserRepository::set_resume_path(pool, user_id, Some(&path)).await?;
                Ok::<(), ApiError>(())
            },
        )
        .await?;

        info!(user_id = %user_id, size = bytes.len(), "Resume uploaded");
        Ok(ResumeUploadResponse {
            msg: "Resume uploaded successfully".to_string(),
            path,
        })
    }

    pub async fn delete(pool: &PgPool, files: &dyn FileStore, user_id: Uuid) -> Result<MessageResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let path = user
            .resume_path
            .ok_or_else(|| ApiError::NotFound("No resume found to delete".to_string()))?;

        files.delete(&path).await?;
        UserRepository::set_resume_path(pool, user_id, None).await?;

        info!(user_id = %user_id, "Resume deleted");
        Ok(MessageResponse::new("Resume deleted successfully"))
    }

    pub async fn download_own(pool: &PgPool, files: &dyn FileStore, user_id: Uuid) -> Result<ResumeFile, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let path = user
            .resume_path
            .ok_or_else(|| ApiError::NotFound("No resume found".to_string()))?;

        ResumeFile::load(files, &path).await
    }
}
