use crate::api::{self, Drive, DriveFile, FileMetadata, Media, Notification, Permission};
use crate::mime;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("{0}")]
    Remote(#[from] api::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub source_path: PathBuf,
    pub destination_id: String,
    pub name: String,
    pub mime_type: Option<String>,
}

/// What the service reported for a finished upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: String,
    pub parents: Vec<String>,
    pub mime_type: String,
}

pub type UploadResult = Result<UploadedFile, Error>;

/// Uploads `request.source_path` into the container `request.destination_id` as `request.name`.
///
/// A missing source file fails before `drive` is touched. Otherwise exactly one create call
/// is made; its failure is returned as [`Error::Remote`] without retrying.
#[tracing::instrument(skip_all, fields(source = %request.source_path.display(), destination = %request.destination_id))]
pub async fn upload(drive: &impl Drive, request: &UploadRequest) -> UploadResult {
    if !request.source_path.is_file() {
        return Err(Error::SourceNotFound(request.source_path.clone()));
    }

    let mime_type = mime::resolve(request.mime_type.as_deref(), &request.source_path);
    let metadata = FileMetadata::new(&request.name, &request.destination_id);
    let media = Media {
        path: request.source_path.clone(),
        mime_type: mime_type.clone(),
    };

    tracing::info!(name = %request.name, %mime_type, "uploading");
    let file = drive.create_file(&metadata, &media).await.map_err(|e| {
        tracing::warn!(error = %e, "upload failed");
        e
    })?;
    tracing::info!(id = %file.id, "uploaded");

    Ok(UploadedFile {
        id: file.id,
        parents: file.parents,
        mime_type,
    })
}

/// Creates a folder named `name` under `parent_id` and returns its id.
#[tracing::instrument(skip(drive))]
pub async fn create_folder(drive: &impl Drive, name: &str, parent_id: &str) -> Result<String, Error> {
    let folder = drive
        .create_metadata(&FileMetadata::folder(name, parent_id))
        .await?;
    tracing::info!(id = %folder.id, "folder created");
    Ok(folder.id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub email: String,
    pub role: String,
    pub notify: bool,
    pub message: Option<String>,
}

/// Grants `request.email` the role `request.role` on a file, folder or shared drive.
/// Returns the permission id.
#[tracing::instrument(skip(drive, request), fields(email = %request.email, role = %request.role))]
pub async fn share(drive: &impl Drive, file_id: &str, request: &ShareRequest) -> Result<String, Error> {
    let permission = Permission::user(&request.email, &request.role);
    let notification = Notification {
        send: request.notify,
        message: request.message.clone(),
    };
    let created = drive
        .create_permission(file_id, &permission, &notification)
        .await?;
    tracing::info!(id = %created.id, "permission created");
    Ok(created.id)
}

/// Lists up to `page_size` children of `parent_id`, proving the account can read it.
#[tracing::instrument(skip(drive))]
pub async fn list_children(
    drive: &impl Drive,
    parent_id: &str,
    page_size: u32,
) -> Result<Vec<DriveFile>, Error> {
    let files = drive.list_children(parent_id, page_size).await?;
    tracing::info!(count = files.len(), "children listed");
    Ok(files)
}
