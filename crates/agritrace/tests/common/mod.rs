//! Shared test utilities for agritrace integration tests.
//!
//! This module provides:
//! - `TestHarness` bundling a migrated in-memory database with a media
//!   store rooted in a temp directory
//! - Seed helpers that insert realistic rows through the public service
//!   functions

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{png_upload, video_upload, TestHarness};
