//! Segment completion model and job status derivation.

use serde::{Deserialize, Serialize};

use crate::db::entities::processing_segment;
use crate::error::ServiceError;

/// The five fixed sub-steps of a warehouse job, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Feed,
    Press,
    Refine,
    Package,
    Store,
}

impl SegmentKind {
    /// All kinds, in processing order.
    pub const ALL: [SegmentKind; 5] = [
        SegmentKind::Feed,
        SegmentKind::Press,
        SegmentKind::Refine,
        SegmentKind::Package,
        SegmentKind::Store,
    ];

    /// Stored name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Feed => "feed",
            SegmentKind::Press => "press",
            SegmentKind::Refine => "refine",
            SegmentKind::Package => "package",
            SegmentKind::Store => "store",
        }
    }

    /// Parses a stored or caller-supplied kind name.
    pub fn parse(value: &str) -> Option<SegmentKind> {
        match value {
            "feed" => Some(SegmentKind::Feed),
            "press" => Some(SegmentKind::Press),
            "refine" => Some(SegmentKind::Refine),
            "package" => Some(SegmentKind::Package),
            "store" => Some(SegmentKind::Store),
            _ => None,
        }
    }

    /// Position in the fixed processing order, zero-based.
    pub fn index(&self) -> usize {
        match self {
            SegmentKind::Feed => 0,
            SegmentKind::Press => 1,
            SegmentKind::Refine => 2,
            SegmentKind::Package => 3,
            SegmentKind::Store => 4,
        }
    }
}

/// Aggregate status of a warehouse job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Preparing,
    InProgress,
    Complete,
}

impl JobStatus {
    /// Stored name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Preparing => "preparing",
            JobStatus::InProgress => "in_progress",
            JobStatus::Complete => "complete",
        }
    }

    /// Parses a stored or caller-supplied status name.
    pub fn parse(value: &str) -> Option<JobStatus> {
        match value {
            "preparing" => Some(JobStatus::Preparing),
            "in_progress" => Some(JobStatus::InProgress),
            "complete" => Some(JobStatus::Complete),
            _ => None,
        }
    }
}

/// Completion flags of the five segments of one job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionFlags {
    pub feed: bool,
    pub press: bool,
    pub refine: bool,
    pub package: bool,
    pub store: bool,
}

impl CompletionFlags {
    /// Collects completion flags from the segment rows of one job.
    ///
    /// Requires exactly one segment per kind. Segments are created with
    /// the job, so a missing, duplicated or unknown kind means the rows
    /// were corrupted and derivation must not guess.
    pub fn from_segments(segments: &[processing_segment::Model]) -> Result<Self, ServiceError> {
        let mut flags = CompletionFlags::default();
        let mut counts = [0u8; SegmentKind::ALL.len()];

        for segment in segments {
            let kind = SegmentKind::parse(&segment.kind).ok_or_else(|| {
                ServiceError::integrity(format!(
                    "Segment '{}' has unknown kind '{}'",
                    segment.id, segment.kind
                ))
            })?;
            let slot = kind.index();
            counts[slot] += 1;
            if counts[slot] > 1 {
                return Err(ServiceError::integrity(format!(
                    "Job '{}' has more than one '{}' segment",
                    segment.job_id,
                    kind.as_str()
                )));
            }
            if segment.completed {
                flags.set(kind);
            }
        }

        for kind in SegmentKind::ALL {
            if counts[kind.index()] == 0 {
                let job_id = segments.first().map(|s| s.job_id.as_str()).unwrap_or("?");
                return Err(ServiceError::integrity(format!(
                    "Job '{}' is missing its '{}' segment",
                    job_id,
                    kind.as_str()
                )));
            }
        }

        Ok(flags)
    }

    fn set(&mut self, kind: SegmentKind) {
        match kind {
            SegmentKind::Feed => self.feed = true,
            SegmentKind::Press => self.press = true,
            SegmentKind::Refine => self.refine = true,
            SegmentKind::Package => self.package = true,
            SegmentKind::Store => self.store = true,
        }
    }
}

/// Derives the aggregate job status from segment completion.
///
/// The final `store` segment decides completion outright, whatever the
/// earlier segments say; otherwise any completed segment means work has
/// started.
pub fn derive_status(flags: &CompletionFlags) -> JobStatus {
    if flags.store {
        return JobStatus::Complete;
    }
    if flags.feed || flags.press || flags.refine || flags.package {
        return JobStatus::InProgress;
    }
    JobStatus::Preparing
}
