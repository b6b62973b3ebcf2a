//! Google Drive v3 wire types and the storage seam used by [`crate::helper`].

use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{io, path::PathBuf};
use thiserror::Error;

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Fields requested back from an upload.
pub const UPLOAD_FIELDS: &str = "id,parents";

/// Fields requested for each listed child.
pub const LIST_FIELDS: &str = "files(id,name,mimeType,parents)";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("Serde JSON parsing error: {0}. Response: {1}")]
    SerdeJSONError(#[source] serde_json::Error, String),
    #[error("Drive API error {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("Resumable upload session was not opened: no Location header in response")]
    MissingSession,
    #[error("Resumable upload session was not opened: Location header is not a valid URI string")]
    InvalidSession,
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Metadata record sent with a create request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub name: String,
    pub parents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileMetadata {
    pub fn new(name: impl Into<String>, parent: impl Into<String>) -> Self {
        FileMetadata {
            name: name.into(),
            parents: vec![parent.into()],
            mime_type: None,
        }
    }

    pub fn folder(name: impl Into<String>, parent: impl Into<String>) -> Self {
        FileMetadata {
            mime_type: Some(FOLDER_MIME_TYPE.to_owned()),
            ..FileMetadata::new(name, parent)
        }
    }
}

/// A file resource as reported by the service. Only the requested fields are present.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: Option<String>,
    pub mime_type: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
}

/// Local content for a create-with-content request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub path: PathBuf,
    pub mime_type: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(rename = "type")]
    pub kind: String,
    pub role: String,
    pub email_address: String,
}

impl Permission {
    pub fn user(email_address: impl Into<String>, role: impl Into<String>) -> Self {
        Permission {
            kind: "user".to_owned(),
            role: role.into(),
            email_address: email_address.into(),
        }
    }
}

/// One page of `files.list`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreatedPermission {
    pub id: String,
}

/// Whether the grantee gets an email, and with which message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub send: bool,
    pub message: Option<String>,
}

/// An authenticated handle able to create objects in Drive.
///
/// Every call addresses shared drives too (`supportsAllDrives=true`).
#[allow(async_fn_in_trait)]
pub trait Drive {
    /// Creates a file with content through a resumable transfer, asking for [`UPLOAD_FIELDS`].
    async fn create_file(&self, metadata: &FileMetadata, media: &Media) -> Result<DriveFile, Error>;
    /// Creates a content-less file such as a folder; only `id` is requested.
    async fn create_metadata(&self, metadata: &FileMetadata) -> Result<DriveFile, Error>;
    async fn create_permission(
        &self,
        file_id: &str,
        permission: &Permission,
        notification: &Notification,
    ) -> Result<CreatedPermission, Error>;
    /// Lists the first `page_size` direct children of a folder or shared drive.
    async fn list_children(&self, parent_id: &str, page_size: u32) -> Result<Vec<DriveFile>, Error>;
}

/// The `q` expression selecting the direct children of `parent_id`.
pub fn children_query(parent_id: &str) -> String {
    let escaped = parent_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}' in parents", escaped)
}

pub fn folder_link(folder_id: &str) -> String {
    format!("https://drive.google.com/drive/folders/{}", folder_id)
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turns a failed response body into [`Error::ApiError`], keeping Google's message when present.
pub(crate) fn api_error(status: StatusCode, body: String) -> Error {
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(x) => x.error.message,
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body,
    };
    Error::ApiError {
        status: status.as_u16(),
        message,
    }
}

pub(crate) async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(api_error(status, body));
    }

    serde_json::from_str(&body).map_err(|e| Error::SerdeJSONError(e, body))
}
