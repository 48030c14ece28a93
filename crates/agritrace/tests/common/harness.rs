//! Test harness for isolated test execution.
//!
//! `TestHarness` wires the services the way a host application would:
//! one database connection (in-memory, migrations applied) and one
//! media store root, both torn down with the test.

#![allow(dead_code)]

use std::path::Path;

use sea_orm::DatabaseConnection;
use tempfile::TempDir;

use agritrace::db;
use agritrace::storage::{MediaStore, MediaUpload};
use agritrace::warehouse::WarehouseService;

/// Isolated environment holding the database and the media root.
pub struct TestHarness {
    media_dir: TempDir,
    pub db: DatabaseConnection,
}

impl TestHarness {
    pub async fn new() -> Self {
        let media_dir = TempDir::new().expect("Failed to create temp directory");
        let db = db::connect_in_memory()
            .await
            .expect("Failed to create test database");
        TestHarness { media_dir, db }
    }

    /// Root of the media store, for asserting on stored files.
    pub fn media_path(&self) -> &Path {
        self.media_dir.path()
    }

    /// A warehouse service sharing this harness's database and media root.
    pub fn warehouse(&self) -> WarehouseService {
        WarehouseService::new(self.db.clone(), MediaStore::new(self.media_dir.path()))
    }

    /// True if a promoted media file with this name exists.
    pub fn media_exists(&self, name: &str) -> bool {
        self.media_dir.path().join(name).is_file()
    }

    /// Number of files left behind in the staging area.
    pub fn staged_count(&self) -> usize {
        match std::fs::read_dir(self.media_dir.path().join(".staging")) {
            Ok(entries) => entries.filter_map(|entry| entry.ok()).count(),
            Err(_) => 0,
        }
    }
}

/// A minimal image upload; the store only inspects the file name.
pub fn png_upload(name: &str) -> MediaUpload {
    MediaUpload::new(name, vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a])
}

/// A minimal video upload.
pub fn video_upload(name: &str) -> MediaUpload {
    MediaUpload::new(name, vec![0x00, 0x00, 0x00, 0x18, 0x66, 0x74, 0x79, 0x70])
}
