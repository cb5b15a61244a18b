//! Direct-to-storage upload batches.
//!
//! Each picked file becomes an [`UploadItem`]: a client-generated id,
//! metadata derived from the file name, the bytes to send, and a
//! progress channel the UI can watch. The batch uploads sequentially,
//! and registration with the backend happens only after every object
//! landed; a single failed PUT abandons the batch so the backend never
//! learns about half-uploaded attachments.

use bytes::Bytes;
use parlor_api::ApiClient;
use parlor_core::{
    FileExtension, FileId, FileKind, FileMetaError, FileMetadata, NewFileEntry, RoomId,
    preserve_extension,
};
use rand::{Rng, distributions::Alphanumeric};
use tokio::sync::watch;

/// Length of client-generated file ids.
const FILE_ID_LEN: usize = 21;

/// Generate an opaque file id for the object path.
fn new_file_id() -> FileId {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FILE_ID_LEN)
        .map(char::from)
        .collect()
}

/// Lifecycle of one staged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// Not yet sent.
    Staged,
    /// PUT in flight.
    Uploading,
    /// Bytes landed in object storage.
    Done,
    /// The PUT failed; the batch was abandoned.
    Failed,
}

/// One file staged for upload.
#[derive(Debug)]
pub struct UploadItem {
    id: FileId,
    file_name: String,
    metadata: FileMetadata,
    bytes: Bytes,
    progress: watch::Sender<f64>,
    state: UploadState,
}

impl UploadItem {
    /// Stage `bytes` picked under `file_name`. Fails when the name has
    /// no usable extension.
    pub fn new(file_name: &str, bytes: Bytes) -> Result<Self, FileMetaError> {
        let metadata = FileMetadata::from_name(file_name, bytes.len() as u64)?;
        let (progress, _) = watch::channel(0.0);
        Ok(Self {
            id: new_file_id(),
            file_name: file_name.to_owned(),
            metadata,
            bytes,
            progress,
            state: UploadState::Staged,
        })
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> UploadState {
        self.state
    }

    /// Display name the file registers under.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Rename the file. The original extension is preserved so the
    /// rename cannot change what the backend thinks the file is.
    pub fn rename(&mut self, new_name: &str) {
        self.file_name = preserve_extension(&self.file_name, new_name);
    }

    /// Fraction uploaded so far, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        *self.progress.borrow()
    }

    /// Watch channel for progress updates, for UI bindings.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.progress.subscribe()
    }

    /// Object-storage path the bytes upload under.
    pub fn object_path(&self) -> String {
        format!("files/{}.{}", self.id, self.metadata.extension.as_str())
    }

    /// Registration payload for the backend, after the object landed.
    pub fn registration(&self, room_id: RoomId, parent_id: Option<FileId>) -> NewFileEntry {
        NewFileEntry {
            id: self.id.clone(),
            file_name: self.file_name.clone(),
            file_extension: self.metadata.extension,
            file_type: self.metadata.kind,
            file_size: self.metadata.size_mb,
            room_id,
            parent_id,
        }
    }
}

/// Registration payload for a new folder. Folders are file entries
/// with a synthetic extension and no bytes behind them.
pub(crate) fn folder_registration(
    name: &str,
    room_id: RoomId,
    parent_id: Option<FileId>,
) -> NewFileEntry {
    NewFileEntry {
        id: new_file_id(),
        file_name: name.to_owned(),
        file_extension: FileExtension::Folder,
        file_type: FileKind::Folder,
        file_size: 0.0,
        room_id,
        parent_id,
    }
}

/// Upload every item's bytes to storage, sequentially.
///
/// Stops at the first failure and returns it; callers must not register
/// the batch unless this returns `Ok`.
pub(crate) async fn upload_all(
    client: &ApiClient,
    items: &mut [UploadItem],
) -> parlor_api::Result<()> {
    for item in items {
        item.state = UploadState::Uploading;
        let outcome = put_item(client, item).await;
        match outcome {
            Ok(()) => item.state = UploadState::Done,
            Err(error) => {
                item.state = UploadState::Failed;
                return Err(error);
            },
        }
    }
    Ok(())
}

async fn put_item(client: &ApiClient, item: &UploadItem) -> parlor_api::Result<()> {
    let signed = client.signed_url(&item.object_path()).await?;
    let progress = item.progress.clone();
    client
        .put_object(&signed.put_url, item.bytes.clone(), move |fraction| {
            // send_replace updates the value even with no subscribers;
            // send would silently drop the fraction once the initial
            // receiver is gone.
            progress.send_replace(fraction);
        })
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parlor_core::{FileExtension, FileKind};

    use super::*;

    #[test]
    fn object_path_uses_generated_id_and_extension() {
        let item = UploadItem::new("report.pdf", Bytes::from_static(b"pdf bytes")).unwrap();
        let path = item.object_path();
        assert!(path.starts_with("files/"));
        assert!(path.ends_with(".pdf"));
        assert_eq!(path.len(), "files/".len() + FILE_ID_LEN + ".pdf".len());
    }

    #[test]
    fn registration_carries_derived_metadata() {
        let bytes = Bytes::from(vec![0_u8; 1_048_576]);
        let item = UploadItem::new("photo.png", bytes).unwrap();
        let entry = item.registration(9, Some("folder-a".to_owned()));

        assert_eq!(entry.file_name, "photo.png");
        assert_eq!(entry.file_extension, FileExtension::Png);
        assert_eq!(entry.file_type, FileKind::Image);
        assert!((entry.file_size - 1.0).abs() < f64::EPSILON);
        assert_eq!(entry.room_id, 9);
        assert_eq!(entry.parent_id.as_deref(), Some("folder-a"));
    }

    #[test]
    fn rejects_names_without_a_usable_extension() {
        assert!(UploadItem::new("notes", Bytes::new()).is_err());
        assert!(UploadItem::new("archive.zip", Bytes::new()).is_err());
    }

    #[test]
    fn rename_keeps_the_original_extension() {
        let mut item = UploadItem::new("photo.png", Bytes::new()).unwrap();
        item.rename("holiday.pdf");
        assert_eq!(item.file_name(), "holiday.png");
        assert_eq!(item.registration(1, None).file_extension, FileExtension::Png);
    }

    #[test]
    fn items_start_staged_with_zero_progress() {
        let item = UploadItem::new("a.jpg", Bytes::from_static(b"x")).unwrap();
        assert_eq!(item.state(), UploadState::Staged);
        assert!((item.progress() - 0.0).abs() < f64::EPSILON);
    }
}
