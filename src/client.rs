use crate::api::{
    self, CreatedPermission, Drive, DriveFile, Error, FileList, FileMetadata, Media,
    Notification, Permission, LIST_FIELDS,
};
use crate::auth::{self, ServiceAccountKey};
use crate::uploader::{self, ProgressListener};

pub const API_URL: &str = "https://www.googleapis.com";

/// An authenticated Drive v3 handle.
///
/// Holds one access token for the lifetime of the invocation; nothing is refreshed.
pub struct Client {
    http: reqwest::Client,
    access_token: String,
    api_url: String,
    upload_url: String,
    progress_listener: Option<ProgressListener>,
}

impl Client {
    pub fn new(access_token: impl Into<String>) -> Self {
        Client {
            http: reqwest::Client::new(),
            access_token: access_token.into(),
            api_url: API_URL.to_owned(),
            upload_url: API_URL.to_owned(),
            progress_listener: None,
        }
    }

    /// Authorizes `key` for `scopes` and returns a client carrying the granted token.
    pub async fn from_service_account(
        key: &ServiceAccountKey,
        scopes: &[&str],
    ) -> Result<Self, auth::Error> {
        let http = reqwest::Client::new();
        let token = auth::authorize(&http, key, scopes).await?;
        Ok(Client {
            http,
            ..Client::new(token.access_token)
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_progress_listener(mut self, progress_listener: ProgressListener) -> Self {
        self.progress_listener = Some(progress_listener);
        self
    }
}

impl Drive for Client {
    async fn create_file(&self, metadata: &FileMetadata, media: &Media) -> Result<DriveFile, Error> {
        uploader::upload(
            &self.http,
            &self.upload_url,
            &self.access_token,
            metadata,
            media,
            self.progress_listener.clone(),
        )
        .await
    }

    async fn create_metadata(&self, metadata: &FileMetadata) -> Result<DriveFile, Error> {
        let response = self
            .http
            .post(format!("{}/drive/v3/files", self.api_url))
            .query(&[("supportsAllDrives", "true"), ("fields", "id")])
            .bearer_auth(&self.access_token)
            .json(metadata)
            .send()
            .await?;

        api::parse_response(response).await
    }

    async fn create_permission(
        &self,
        file_id: &str,
        permission: &Permission,
        notification: &Notification,
    ) -> Result<CreatedPermission, Error> {
        let mut query = vec![
            ("supportsAllDrives", "true"),
            (
                "sendNotificationEmail",
                if notification.send { "true" } else { "false" },
            ),
        ];
        if let (true, Some(message)) = (notification.send, notification.message.as_deref()) {
            query.push(("emailMessage", message));
        }

        let response = self
            .http
            .post(format!("{}/drive/v3/files/{}/permissions", self.api_url, file_id))
            .query(&query)
            .bearer_auth(&self.access_token)
            .json(permission)
            .send()
            .await?;

        api::parse_response(response).await
    }

    async fn list_children(&self, parent_id: &str, page_size: u32) -> Result<Vec<DriveFile>, Error> {
        let response = self
            .http
            .get(format!("{}/drive/v3/files", self.api_url))
            .query(&[
                ("q", api::children_query(parent_id)),
                ("supportsAllDrives", "true".to_owned()),
                ("includeItemsFromAllDrives", "true".to_owned()),
                ("pageSize", page_size.to_string()),
                ("fields", LIST_FIELDS.to_owned()),
            ])
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let list: FileList = api::parse_response(response).await?;
        Ok(list.files)
    }
}
