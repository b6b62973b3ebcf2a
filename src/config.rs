//! Command-line and environment configuration shared by the binaries.

use crate::auth::{self, ServiceAccountKey, DRIVE_SCOPE};
use crate::client::{Client, API_URL};
use clap::{Args, Parser};
use std::path::PathBuf;

/// Where the service account key lives and which endpoints to talk to.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Service account JSON key file
    #[arg(
        long,
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        default_value = "service-account.json"
    )]
    pub credentials: PathBuf,

    /// OAuth scope to request; repeat for several
    #[arg(long = "scope", default_value = DRIVE_SCOPE)]
    pub scopes: Vec<String>,

    #[arg(long, env = "DRIVE_API_URL", default_value = API_URL, hide = true)]
    pub api_url: String,

    #[arg(long, env = "DRIVE_UPLOAD_URL", default_value = API_URL, hide = true)]
    pub upload_url: String,
}

impl Settings {
    /// Loads and validates the key, then authorizes a [`Client`] against the configured endpoints.
    pub async fn connect(&self) -> Result<Client, auth::Error> {
        let key = ServiceAccountKey::from_file(&self.credentials)?;
        key.validate()?;
        let scopes = self.scopes.iter().map(String::as_str).collect::<Vec<_>>();

        tracing::debug!(credentials = %self.credentials.display(), ?scopes, "authorizing");
        let client = Client::from_service_account(&key, &scopes)
            .await?
            .with_api_url(&self.api_url)
            .with_upload_url(&self.upload_url);
        Ok(client)
    }
}

/// Upload a local file into a Drive folder or shared drive.
#[derive(Parser, Debug)]
#[command(name = "drive-upload", version)]
pub struct UploadArgs {
    /// Local file to upload
    pub source_path: PathBuf,
    /// Destination folder or shared drive id
    pub destination_id: String,
    /// Name of the created file
    pub name: String,
    /// Content type; guessed from the extension when omitted
    #[arg(long)]
    pub mime_type: Option<String>,
    #[command(flatten)]
    pub settings: Settings,
}

/// Create a folder inside a Drive folder or shared drive.
#[derive(Parser, Debug)]
#[command(name = "drive-mkdir", version)]
pub struct MkdirArgs {
    /// Folder name
    pub name: String,
    /// Parent folder or shared drive id
    pub parent_id: String,
    #[command(flatten)]
    pub settings: Settings,
}

/// Grant a user access to a file, folder or shared drive.
#[derive(Parser, Debug)]
#[command(name = "drive-share", version)]
pub struct ShareArgs {
    /// File, folder or shared drive id
    pub file_id: String,
    /// Email address of the grantee
    pub email: String,
    /// organizer, fileOrganizer, writer, commenter or reader
    #[arg(long, default_value = "organizer")]
    pub role: String,
    /// Do not email the grantee
    #[arg(long)]
    pub no_notify: bool,
    /// Message included in the notification email
    #[arg(long)]
    pub message: Option<String>,
    #[command(flatten)]
    pub settings: Settings,
}

/// Check that the service account can see a folder or shared drive.
#[derive(Parser, Debug)]
#[command(name = "drive-check", version)]
pub struct CheckArgs {
    /// Folder or shared drive id
    pub parent_id: String,
    /// How many children to list
    #[arg(long, default_value_t = 10)]
    pub page_size: u32,
    #[command(flatten)]
    pub settings: Settings,
}
