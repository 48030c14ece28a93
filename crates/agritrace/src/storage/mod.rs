//! Media file store with staged, two-phase writes.
//!
//! Uploads land in a `.staging` directory under a generated name. The
//! caller promotes the staged file into the store root only after the
//! owning database row has committed, or discards it when the
//! transaction fails, so the store never holds a blob no row references.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StorageError;

/// Subdirectory holding files whose owning row has not committed yet.
const STAGING_DIR: &str = ".staging";

/// Media category accepted for segment attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// An upload payload: the client's file name plus raw content.
///
/// The original name is only used to derive the extension and media
/// kind; stored files always get a generated name.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub content: Vec<u8>,
}

impl MediaUpload {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        MediaUpload {
            filename: filename.into(),
            content,
        }
    }
}

/// Classifies a file name by its guessed MIME type.
///
/// Only images and videos are storable; everything else is rejected
/// before any byte is written.
pub fn classify(filename: &str) -> Option<MediaKind> {
    let mime = mime_guess::from_path(filename).first()?;
    if mime.type_() == mime_guess::mime::IMAGE {
        Some(MediaKind::Image)
    } else if mime.type_() == mime_guess::mime::VIDEO {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// File store rooted at one directory, with a staging area for
/// uncommitted writes.
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        MediaStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final path of a stored file name.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Writes an upload into the staging area under a generated name.
    ///
    /// Validates the media kind first; nothing is written for an
    /// unsupported type. The returned handle must be promoted or
    /// discarded once the owning transaction settles.
    pub fn stage(&self, upload: &MediaUpload) -> Result<StagedMedia, StorageError> {
        classify(&upload.filename).ok_or_else(|| StorageError::UnsupportedMedia {
            filename: upload.filename.clone(),
        })?;

        let name = match extension_of(&upload.filename) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let staging_dir = self.root.join(STAGING_DIR);
        ensure_directory(&staging_dir)?;

        let staging_path = staging_dir.join(&name);

        // create_new is atomic check-and-create; an existing staged file
        // under a fresh UUID name means something is badly wrong.
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staging_path)
            .map_err(|e| StorageError::WriteFile {
                path: staging_path.clone(),
                source: e,
            })?;
        file.write_all(&upload.content)
            .map_err(|e| StorageError::WriteFile {
                path: staging_path.clone(),
                source: e,
            })?;

        debug!(name = %name, bytes = upload.content.len(), "staged media upload");

        Ok(StagedMedia {
            name: name.clone(),
            staging_path,
            final_path: self.root.join(&name),
        })
    }

    /// Removes a stored file by name.
    ///
    /// A missing file counts as already deleted; the row referencing it
    /// is gone either way.
    pub fn delete(&self, name: &str) -> Result<(), StorageError> {
        if !is_safe_name(name) {
            return Err(StorageError::InvalidName {
                name: name.to_string(),
            });
        }
        let path = self.root.join(name);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(name = %name, "deleted stored media");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::RemoveFile { path, source: e }),
        }
    }
}

/// A staged upload awaiting the outcome of its owning transaction.
#[derive(Debug)]
pub struct StagedMedia {
    name: String,
    staging_path: PathBuf,
    final_path: PathBuf,
}

impl StagedMedia {
    /// Generated stored name, the only thing rows reference.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Moves the staged file to its final location. Call after commit.
    pub fn promote(self) -> Result<String, StorageError> {
        move_file(&self.staging_path, &self.final_path)?;
        debug!(name = %self.name, "promoted staged media");
        Ok(self.name)
    }

    /// Removes the staged file. Call after rollback; failures are
    /// logged, not surfaced, since the transaction outcome already
    /// decided the operation's result.
    pub fn discard(self) {
        if let Err(e) = std::fs::remove_file(&self.staging_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    path = %self.staging_path.display(),
                    error = %e,
                    "failed to discard staged media"
                );
            }
        }
    }
}

/// Move a file from `src` to `dst`. Uses `rename` first (fast, atomic
/// on same filesystem) and falls back to copy + delete for cross-device
/// moves.
fn move_file(src: &Path, dst: &Path) -> Result<(), StorageError> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    std::fs::copy(src, dst).map_err(|e| StorageError::MoveFile {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source: e,
    })?;
    std::fs::remove_file(src).map_err(|e| StorageError::MoveFile {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

fn ensure_directory(path: &Path) -> Result<(), StorageError> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Lowercased extension of the original file name, if it has a sane one.
fn extension_of(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Stored names are generated (`<uuid>.<ext>`); anything outside that
/// shape is refused so a crafted name can never escape the store root.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}
