//! Direct-to-storage uploads.
//!
//! Files never pass through the backend: the client asks it for a
//! time-limited signed PUT URL, then streams the bytes straight to
//! object storage. The signed URL is pre-authorized, so the PUT carries
//! no bearer token.

use bytes::Bytes;
use reqwest::header::CONTENT_LENGTH;
use serde::Deserialize;

use crate::{ApiClient, ApiError, Error, Result, routes};

/// Chunk size for the streaming upload body. Progress is reported once
/// per chunk handed to the transport.
const UPLOAD_CHUNK: usize = 64 * 1024;

/// A signed URL pair for one object.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedUrl {
    /// Time-limited, pre-authorized PUT URL.
    pub put_url: String,
    /// Stable download URL to register with the backend.
    pub get_url: String,
}

impl ApiClient {
    /// Issue a signed URL pair for `file_path` (e.g. `files/{id}.png`).
    pub async fn signed_url(&self, file_path: &str) -> Result<SignedUrl> {
        self.get_json(routes::SIGNED_URL, &[("file_path", file_path.to_owned())])
            .await
    }

    /// PUT `bytes` to a signed URL, reporting fractional progress in
    /// `0.0..=1.0` as chunks are handed to the transport.
    pub async fn put_object(
        &self,
        put_url: &str,
        bytes: Bytes,
        on_progress: impl Fn(f64) + Send + Sync + 'static,
    ) -> Result<()> {
        let total = bytes.len();
        on_progress(0.0);

        let body = if total == 0 {
            reqwest::Body::from(bytes)
        } else {
            let chunks: Vec<Bytes> = (0..total)
                .step_by(UPLOAD_CHUNK)
                .map(|start| bytes.slice(start..usize::min(start + UPLOAD_CHUNK, total)))
                .collect();

            let mut sent = 0_usize;
            let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
                sent += chunk.len();
                on_progress(sent as f64 / total as f64);
                Ok::<Bytes, std::convert::Infallible>(chunk)
            }));
            reqwest::Body::wrap_stream(stream)
        };

        let response = self
            .inner
            .http
            .put(put_url)
            .header(CONTENT_LENGTH, total)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                source: ApiError {
                    status: status.as_u16(),
                    code: None,
                    message: "object upload failed".to_owned(),
                },
                body: None,
            });
        }

        Ok(())
    }
}
