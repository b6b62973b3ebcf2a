use crate::api::{self, DriveFile, Error, FileMetadata, Media, UPLOAD_FIELDS};
use core::task::Poll;
use reqwest::{
    header::{self, HeaderMap},
    Body, Client,
};
use std::{
    pin::Pin,
    sync::{Arc, Mutex},
};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

const CHUNK_SIZE: usize = 256 * 1024;

/// Called with `(name, sent, total)` while the file content is streamed.
pub type ProgressListener = Arc<Mutex<dyn FnMut(Arc<String>, usize, usize) + Send + Sync + 'static>>;

/// Uploads `media` as a new file through a Drive resumable session.
///
/// The session is opened with the metadata, then the content goes out in a single `PUT`,
/// read from disk at most [`CHUNK_SIZE`] bytes at a time.
/// An interrupted transfer is returned as an error; the session is not resumed.
pub async fn upload(
    http: &Client,
    upload_url: &str,
    access_token: &str,
    metadata: &FileMetadata,
    media: &Media,
    progress_listener: Option<ProgressListener>,
) -> Result<DriveFile, Error> {
    let file = tokio::fs::File::open(&media.path).await?;
    let content_length = file.metadata().await?.len();
    let session = open_session(http, upload_url, access_token, metadata, media, content_length).await?;
    tracing::debug!(session = %session, bytes = content_length, "resumable session opened");

    // bytes appended after the session was opened are not sent
    let body = Body::wrap_stream(ProgressStream::new(
        metadata.name.clone(),
        file.take(content_length),
        content_length as usize,
        progress_listener,
    ));

    let response = http
        .put(&session)
        .bearer_auth(access_token)
        .header(header::CONTENT_TYPE, &media.mime_type)
        .header(header::CONTENT_LENGTH, content_length)
        .body(body)
        .send()
        .await?;

    api::parse_response(response).await
}

async fn open_session(
    http: &Client,
    upload_url: &str,
    access_token: &str,
    metadata: &FileMetadata,
    media: &Media,
    content_length: u64,
) -> Result<String, Error> {
    let response = http
        .post(format!("{}/upload/drive/v3/files", upload_url))
        .query(&[
            ("uploadType", "resumable"),
            ("supportsAllDrives", "true"),
            ("fields", UPLOAD_FIELDS),
        ])
        .bearer_auth(access_token)
        .header("X-Upload-Content-Type", &media.mime_type)
        .header("X-Upload-Content-Length", content_length)
        .json(metadata)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(api::api_error(status, body));
    }

    session_uri(response.headers())
}

fn session_uri(headers: &HeaderMap) -> Result<String, Error> {
    headers
        .get(header::LOCATION)
        .ok_or(Error::MissingSession)?
        .to_str()
        .map(str::to_owned)
        .map_err(|_| Error::InvalidSession)
}

/// Streams a reader in chunks of at most [`CHUNK_SIZE`], reporting progress after each one.
pub struct ProgressStream<R> {
    name: Arc<String>,
    reader: R,
    buf: Vec<u8>,
    sent: usize,
    total: usize,
    progress_listener: Option<ProgressListener>,
}

impl<R: AsyncRead + Unpin> ProgressStream<R> {
    pub fn new(
        name: String,
        reader: R,
        total: usize,
        progress_listener: Option<ProgressListener>,
    ) -> Self {
        ProgressStream {
            name: Arc::new(name),
            reader,
            buf: vec![0u8; CHUNK_SIZE],
            sent: 0,
            total,
            progress_listener,
        }
    }
}

impl<R: AsyncRead + Unpin> futures::Stream for ProgressStream<R> {
    type Item = std::io::Result<Vec<u8>>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        let mut read_buf = ReadBuf::new(&mut this.buf);

        match Pin::new(&mut this.reader).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(e))),
            Poll::Ready(Ok(())) if read_buf.filled().is_empty() => Poll::Ready(None),
            Poll::Ready(Ok(())) => {
                let chunk = read_buf.filled().to_vec();
                this.sent += chunk.len();

                if let Some(pl) = this.progress_listener.as_ref() {
                    if let Ok(mut f) = pl.lock() {
                        f(this.name.clone(), this.sent, this.total);
                    }
                }

                Poll::Ready(Some(Ok(chunk)))
            }
        }
    }
}
