//! The flows behind `drive-upload`, `drive-mkdir`, `drive-share` and `drive-check`.
//!
//! Each flow writes `✅` status lines on success or a single `❌ ERROR` line on failure
//! to `out` (stdout in the binaries), and returns the process exit status: `0` on success,
//! `1` otherwise.

use crate::api::{self, Drive};
use crate::auth;
use crate::config::{CheckArgs, MkdirArgs, ShareArgs, UploadArgs};
use crate::helper::{self, ShareRequest, UploadRequest};
use std::future::Future;
use std::io::{self, Write};
use std::process::ExitCode;

pub const SUCCESS: u8 = 0;
pub const FAILURE: u8 = 1;

/// Maps a flow's status to the process exit code. A broken `out` counts as failure.
pub fn exit_code(status: io::Result<u8>) -> ExitCode {
    match status {
        Ok(x) => ExitCode::from(x),
        Err(e) => {
            eprintln!("could not write status: {e}");
            ExitCode::from(FAILURE)
        }
    }
}

/// How many listed children `drive-check` prints.
const CHECK_SAMPLE: usize = 3;

async fn authenticate<D, F, Fut>(connect: F, out: &mut impl Write) -> io::Result<Option<D>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<D, auth::Error>>,
{
    match connect().await {
        Ok(x) => Ok(Some(x)),
        Err(e) => {
            writeln!(out, "❌ ERROR authenticating: {}", e)?;
            Ok(None)
        }
    }
}

/// Runs an upload. `connect` is only called once the source file is known to exist.
pub async fn run_upload<D, F, Fut>(args: &UploadArgs, connect: F, out: &mut impl Write) -> io::Result<u8>
where
    D: Drive,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<D, auth::Error>>,
{
    if !args.source_path.is_file() {
        writeln!(out, "❌ ERROR: File not found: {}", args.source_path.display())?;
        return Ok(FAILURE);
    }

    let Some(drive) = authenticate(connect, out).await? else {
        return Ok(FAILURE);
    };

    let request = UploadRequest {
        source_path: args.source_path.clone(),
        destination_id: args.destination_id.clone(),
        name: args.name.clone(),
        mime_type: args.mime_type.clone(),
    };

    match helper::upload(&drive, &request).await {
        Ok(file) => {
            writeln!(out, "✅ SUCCESS! File uploaded to folder!")?;
            writeln!(out, "File ID: {}", file.id)?;
            writeln!(out, "Parents: {:?}", file.parents)?;
            writeln!(out, "File name: {}", request.name)?;
            writeln!(out, "Folder ID: {}", request.destination_id)?;
            writeln!(out, "Detected MIME type: {}", file.mime_type)?;
            Ok(SUCCESS)
        }
        Err(e) => {
            writeln!(out, "❌ ERROR uploading file: {}", e)?;
            Ok(FAILURE)
        }
    }
}

pub async fn run_mkdir<D, F, Fut>(args: &MkdirArgs, connect: F, out: &mut impl Write) -> io::Result<u8>
where
    D: Drive,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<D, auth::Error>>,
{
    let Some(drive) = authenticate(connect, out).await? else {
        return Ok(FAILURE);
    };

    match helper::create_folder(&drive, &args.name, &args.parent_id).await {
        Ok(id) => {
            writeln!(out, "✅ SUCCESS! Folder created!")?;
            writeln!(out, "Folder name: {}", args.name)?;
            writeln!(out, "Folder ID: {}", id)?;
            writeln!(out, "Folder link: {}", api::folder_link(&id))?;
            Ok(SUCCESS)
        }
        Err(e) => {
            writeln!(out, "❌ ERROR creating folder: {}", e)?;
            Ok(FAILURE)
        }
    }
}

pub async fn run_share<D, F, Fut>(args: &ShareArgs, connect: F, out: &mut impl Write) -> io::Result<u8>
where
    D: Drive,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<D, auth::Error>>,
{
    let Some(drive) = authenticate(connect, out).await? else {
        return Ok(FAILURE);
    };

    let request = ShareRequest {
        email: args.email.clone(),
        role: args.role.clone(),
        notify: !args.no_notify,
        message: args.message.clone(),
    };

    match helper::share(&drive, &args.file_id, &request).await {
        Ok(id) => {
            writeln!(out, "✅ SUCCESS! Access granted!")?;
            writeln!(out, "Email: {}", request.email)?;
            writeln!(out, "Role: {}", request.role)?;
            writeln!(out, "Permission ID: {}", id)?;
            writeln!(out, "Link: {}", api::folder_link(&args.file_id))?;
            Ok(SUCCESS)
        }
        Err(e) => {
            writeln!(out, "❌ ERROR granting access: {}", e)?;
            Ok(FAILURE)
        }
    }
}

/// Validates the key (through `connect`) and lists the children of the target.
pub async fn run_check<D, F, Fut>(args: &CheckArgs, connect: F, out: &mut impl Write) -> io::Result<u8>
where
    D: Drive,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<D, auth::Error>>,
{
    let Some(drive) = authenticate(connect, out).await? else {
        return Ok(FAILURE);
    };

    match helper::list_children(&drive, &args.parent_id, args.page_size).await {
        Ok(files) => {
            writeln!(out, "✅ SUCCESS! Service account can access the drive")?;
            writeln!(out, "Found {} files/folders", files.len())?;
            for file in files.iter().take(CHECK_SAMPLE) {
                writeln!(
                    out,
                    "  - {} ({})",
                    file.name.as_deref().unwrap_or(&file.id),
                    file.mime_type.as_deref().unwrap_or("unknown")
                )?;
            }
            Ok(SUCCESS)
        }
        Err(e) => {
            writeln!(out, "❌ ERROR checking access: {}", e)?;
            Ok(FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::tests::RecordingDrive;
    use clap::Parser;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn upload_args(source: &str) -> UploadArgs {
        UploadArgs::try_parse_from(["drive-upload", source, "FOLDER123", "report.pdf"]).unwrap()
    }

    fn lines(out: Vec<u8>) -> Vec<String> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn missing_file_exits_without_connecting() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("sample.pdf");
        let counter = AtomicUsize::new(0);
        let connects = &counter;
        let mut out = vec![];

        let status = run_upload(
            &upload_args(source.to_str().unwrap()),
            move || async move {
                connects.fetch_add(1, Ordering::SeqCst);
                Ok::<_, auth::Error>(RecordingDrive::default())
            },
            &mut out,
        )
        .await?;

        assert_eq!(status, FAILURE);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(
            lines(out),
            vec![format!("❌ ERROR: File not found: {}", source.display())]
        );
        Ok(())
    }

    #[tokio::test]
    async fn upload_success_prints_result() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("sample.pdf");
        std::fs::write(&source, b"%PDF")?;
        let mut out = vec![];

        let status = run_upload(
            &upload_args(source.to_str().unwrap()),
            || async { Ok::<_, auth::Error>(RecordingDrive::default()) },
            &mut out,
        )
        .await?;

        assert_eq!(status, SUCCESS);
        assert_eq!(
            lines(out),
            vec![
                "✅ SUCCESS! File uploaded to folder!",
                "File ID: X",
                "Parents: [\"Y\"]",
                "File name: report.pdf",
                "Folder ID: FOLDER123",
                "Detected MIME type: application/pdf",
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn upload_failure_prints_message() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("sample.pdf");
        std::fs::write(&source, b"%PDF")?;
        let mut out = vec![];

        let status = run_upload(
            &upload_args(source.to_str().unwrap()),
            || async { Ok::<_, auth::Error>(RecordingDrive::failing("quota exceeded")) },
            &mut out,
        )
        .await?;

        assert_eq!(status, FAILURE);
        assert_eq!(
            lines(out),
            vec!["❌ ERROR uploading file: Drive API error 403: quota exceeded"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn credential_failure_prints_message() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("sample.pdf");
        std::fs::write(&source, b"%PDF")?;
        let mut out = vec![];

        let status = run_upload(
            &upload_args(source.to_str().unwrap()),
            || async {
                Err::<RecordingDrive, _>(auth::Error::TokenError {
                    status: 400,
                    message: "invalid_grant".to_owned(),
                })
            },
            &mut out,
        )
        .await?;

        assert_eq!(status, FAILURE);
        assert_eq!(
            lines(out),
            vec!["❌ ERROR authenticating: Token endpoint rejected the service account (400): invalid_grant"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn mkdir_statuses() -> anyhow::Result<()> {
        let args = MkdirArgs::try_parse_from(["drive-mkdir", "Clients", "0APe1"])?;

        let mut out = vec![];
        let status = run_mkdir(&args, || async { Ok::<_, auth::Error>(RecordingDrive::default()) }, &mut out).await?;
        assert_eq!(status, SUCCESS);
        let out = lines(out);
        assert_eq!(out[0], "✅ SUCCESS! Folder created!");
        assert!(out.contains(&"Folder ID: FOLDER-NEW".to_owned()));
        assert!(out.contains(&"Folder link: https://drive.google.com/drive/folders/FOLDER-NEW".to_owned()));

        let mut out = vec![];
        let status = run_mkdir(&args, || async { Ok::<_, auth::Error>(RecordingDrive::failing("denied")) }, &mut out).await?;
        assert_eq!(status, FAILURE);
        assert_eq!(lines(out), vec!["❌ ERROR creating folder: Drive API error 403: denied"]);
        Ok(())
    }

    #[tokio::test]
    async fn share_statuses() -> anyhow::Result<()> {
        let args = ShareArgs::try_parse_from(["drive-share", "0APe1", "a@b.c", "--no-notify"])?;

        let mut out = vec![];
        let status = run_share(&args, || async { Ok::<_, auth::Error>(RecordingDrive::default()) }, &mut out).await?;
        assert_eq!(status, SUCCESS);
        let out = lines(out);
        assert_eq!(out[0], "✅ SUCCESS! Access granted!");
        assert!(out.contains(&"Permission ID: PERM-1".to_owned()));

        let mut out = vec![];
        let status = run_share(&args, || async { Ok::<_, auth::Error>(RecordingDrive::failing("denied")) }, &mut out).await?;
        assert_eq!(status, FAILURE);
        assert_eq!(lines(out), vec!["❌ ERROR granting access: Drive API error 403: denied"]);
        Ok(())
    }

    #[tokio::test]
    async fn check_lists_children() -> anyhow::Result<()> {
        let args = CheckArgs::try_parse_from(["drive-check", "0APe1WRUeIBtMUk9PVA", "--page-size", "5"])?;
        let mut out = vec![];

        let status = run_check(&args, || async { Ok::<_, auth::Error>(RecordingDrive::default()) }, &mut out).await?;

        assert_eq!(status, SUCCESS);
        assert_eq!(
            lines(out),
            vec![
                "✅ SUCCESS! Service account can access the drive",
                "Found 2 files/folders",
                "  - Clients (application/vnd.google-apps.folder)",
                "  - report.pdf (application/pdf)",
            ]
        );

        let mut out = vec![];
        let status = run_check(&args, || async { Ok::<_, auth::Error>(RecordingDrive::failing("File not found: 0APe1WRUeIBtMUk9PVA.")) }, &mut out).await?;
        assert_eq!(status, FAILURE);
        assert_eq!(
            lines(out),
            vec!["❌ ERROR checking access: Drive API error 403: File not found: 0APe1WRUeIBtMUk9PVA."]
        );
        Ok(())
    }

    #[test]
    fn broken_output_fails_the_process() {
        let broken = exit_code(Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")));
        assert_eq!(format!("{broken:?}"), format!("{:?}", ExitCode::from(FAILURE)));
        assert_eq!(format!("{:?}", exit_code(Ok(SUCCESS))), format!("{:?}", ExitCode::SUCCESS));
    }
}
