//! File metadata derivation.
//!
//! The backend stores files by extension-derived kind and size in
//! megabytes; both are computed client-side before registration. Only a
//! small extension whitelist is accepted for upload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes per megabyte.
const MB: f64 = 1024.0 * 1024.0;

/// Errors from deriving file metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileMetaError {
    /// The file name has no extension.
    #[error("file name {0:?} has no extension")]
    MissingExtension(String),

    /// The extension is not on the upload whitelist.
    #[error("unsupported file extension {0:?}")]
    UnsupportedExtension(String),
}

/// File extensions accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileExtension {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// JPEG image (alternate spelling).
    Jpg,
    /// PDF document.
    Pdf,
    /// Synthetic extension for folder entries.
    Folder,
}

impl FileExtension {
    /// Parse from a lowercase extension string.
    pub fn parse(ext: &str) -> Result<Self, FileMetaError> {
        match ext {
            "png" => Ok(Self::Png),
            "jpeg" => Ok(Self::Jpeg),
            "jpg" => Ok(Self::Jpg),
            "pdf" => Ok(Self::Pdf),
            "folder" => Ok(Self::Folder),
            other => Err(FileMetaError::UnsupportedExtension(other.to_owned())),
        }
    }

    /// The wire representation of this extension.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Jpg => "jpg",
            Self::Pdf => "pdf",
            Self::Folder => "folder",
        }
    }

    /// The kind this extension maps to.
    pub const fn kind(self) -> FileKind {
        match self {
            Self::Png | Self::Jpeg | Self::Jpg => FileKind::Image,
            Self::Pdf => FileKind::Document,
            Self::Folder => FileKind::Folder,
        }
    }
}

/// Coarse file kind, derived from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileKind {
    /// Raster image.
    Image,
    /// Document.
    Document,
    /// Folder entry.
    Folder,
}

/// Metadata derived from a local file before upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileMetadata {
    /// Parsed extension.
    pub extension: FileExtension,
    /// Kind derived from the extension.
    pub kind: FileKind,
    /// Size in megabytes, rounded to two decimals.
    pub size_mb: f64,
}

impl FileMetadata {
    /// Derive metadata from a file name and its size in bytes.
    pub fn from_name(name: &str, size_bytes: u64) -> Result<Self, FileMetaError> {
        let extension = extension_of(name)?;
        Ok(Self { extension, kind: extension.kind(), size_mb: size_in_mb(size_bytes) })
    }
}

/// Size in megabytes, rounded to two decimals.
pub fn size_in_mb(bytes: u64) -> f64 {
    (bytes as f64 / MB * 100.0).round() / 100.0
}

/// Rename a file while preserving its original extension.
///
/// Anything after the first `.` in the new name is discarded and the
/// original extension is re-attached, so a rename can never change what
/// the backend thinks the file is.
pub fn preserve_extension(original: &str, new_name: &str) -> String {
    let stem = new_name.split('.').next().unwrap_or(new_name);
    match original.rsplit_once('.') {
        Some((_, ext)) => format!("{stem}.{ext}"),
        None => stem.to_owned(),
    }
}

fn extension_of(name: &str) -> Result<FileExtension, FileMetaError> {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or_else(|| FileMetaError::MissingExtension(name.to_owned()))?;
    FileExtension::parse(&ext)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn metadata_from_name_maps_extension_to_kind() {
        let meta = FileMetadata::from_name("photo.JPG", 0).unwrap();
        assert_eq!(meta.extension, FileExtension::Jpg);
        assert_eq!(meta.kind, FileKind::Image);

        let meta = FileMetadata::from_name("notes.pdf", 0).unwrap();
        assert_eq!(meta.kind, FileKind::Document);
    }

    #[test]
    fn missing_or_unknown_extensions_are_rejected() {
        assert_eq!(
            FileMetadata::from_name("README", 0),
            Err(FileMetaError::MissingExtension("README".to_owned()))
        );
        assert_eq!(
            FileMetadata::from_name("archive.tar.gz", 0),
            Err(FileMetaError::UnsupportedExtension("gz".to_owned()))
        );
    }

    #[test]
    fn size_rounds_to_two_decimals() {
        assert!((size_in_mb(1024 * 1024) - 1.0).abs() < f64::EPSILON);
        // 1.5 MiB + a little
        assert!((size_in_mb(1_572_864 + 5_000) - 1.5).abs() < f64::EPSILON);
        assert!((size_in_mb(0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rename_preserves_original_extension() {
        assert_eq!(preserve_extension("photo.png", "holiday"), "holiday.png");
        assert_eq!(preserve_extension("photo.png", "holiday.pdf"), "holiday.png");
        assert_eq!(preserve_extension("noext", "renamed"), "renamed");
    }
}
