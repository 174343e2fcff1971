//! Fixture dataset facts shared by the unit and integration tests
//!
//! The dataset under `tests/fixtures/dataset` is a miniature copy of the
//! production export: every file the loader reads, one Windows-1252 file
//! (`requirements.csv`), a relationship row with a dangling endpoint and a
//! milestone file in non-chronological order.
#![allow(dead_code)]

use std::path::PathBuf;

pub const FIXTURE_NODES: i64 = 28;
pub const FIXTURE_RELATIONSHIPS: i64 = 27;
/// Requirements with a non-empty description
pub const FIXTURE_EMBEDDABLE_REQUIREMENTS: usize = 4;
pub const FIXTURE_EMBEDDABLE_DEFECTS: usize = 2;
/// Milestone ids in deadline order
pub const FIXTURE_MILESTONES: [&str; 3] = ["m_100", "m_200", "m_300"];

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("dataset")
}
