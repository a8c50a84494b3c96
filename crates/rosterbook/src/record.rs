//! Core record types for rosterbook.
//!
//! This module defines the data structure for a single student and the
//! derived computations on it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One student's stored data.
///
/// Represents a single roster entry with identity, demographics, and a
/// mapping of subject names to marks. The `id` is the primary key for all
/// lookups and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier, immutable after creation.
    pub id: String,

    /// Display name; secondary sort key when listing.
    pub name: String,

    /// Age in years. Must be positive; enforced at the input boundary.
    pub age: u32,

    /// Department name; primary sort key when listing.
    pub department: String,

    /// Subject name to mark. Mutated only through the store's update
    /// operation.
    marks: BTreeMap<String, u32>,
}

impl Student {
    /// Create a new student record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        department: impl Into<String>,
        marks: BTreeMap<String, u32>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            department: department.into(),
            marks,
        }
    }

    /// The arithmetic mean of all marks, or `0.0` when no marks exist.
    ///
    /// No rounding is applied; formatting to a fixed number of decimal
    /// places is a presentation concern.
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.marks.is_empty() {
            return 0.0;
        }
        let total: u64 = self.marks.values().map(|&score| u64::from(score)).sum();
        total as f64 / self.marks.len() as f64
    }

    /// Read-only view of the marks mapping.
    #[must_use]
    pub fn marks(&self) -> &BTreeMap<String, u32> {
        &self.marks
    }

    /// Look up the mark for a single subject.
    #[must_use]
    pub fn mark(&self, subject: &str) -> Option<u32> {
        self.marks.get(subject).copied()
    }

    /// Number of subjects with a recorded mark.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.marks.len()
    }

    /// Set or overwrite the mark for a subject.
    ///
    /// Only callable from within the crate; external mutation goes through
    /// `Store::update_marks` so the collection and the file stay in sync.
    pub(crate) fn set_mark(&mut self, subject: impl Into<String>, score: u32) {
        self.marks.insert(subject.into(), score);
    }
}
