//! `drive-upload` is a crate to upload files into Google Drive shared drives with a service account.
//!
//! These features are supported:
//! * Service account key validation and authorization through the OAuth 2.0 JWT bearer grant.
//! * Resumable uploads into folders and shared drives, with progress listening.
//! * Folder creation in shared drives.
//! * Granting users access to files, folders and shared drives.
//! * Checking that the account can list a folder or shared drive.
//!
//! ## Example
//!
//! To upload a single file:
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use drive_upload::{auth, client::Client, helper};
//!
//! let key = auth::ServiceAccountKey::from_file("service-account.json")?;
//! let client = Client::from_service_account(&key, &[auth::DRIVE_SCOPE]).await?;
//!
//! let uploaded = helper::upload(
//!     &client,
//!     &helper::UploadRequest {
//!         source_path: "sample.pdf".into(),  // the local file
//!         destination_id: "FOLDER123".to_owned(),  // folder or shared drive id
//!         name: "report.pdf".to_owned(),  // name of the created file
//!         mime_type: None,  // `None` guesses it from the extension
//!     },
//! )
//! .await?;
//! println!("{} {:?}", uploaded.id, uploaded.parents);
//! # Ok(())
//! # }
//! ```
//!
//! To create a folder:
//! ```no_run
//! # async fn run(client: drive_upload::client::Client) -> Result<(), drive_upload::helper::Error> {
//! let folder_id = drive_upload::helper::create_folder(&client, "Clients", "0APe1WRUeIBtMUk9PVA").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod helper;
pub mod logging;
pub mod mime;
pub mod uploader;
