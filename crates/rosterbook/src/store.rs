//! Storage layer for rosterbook.
//!
//! This module owns the in-memory collection of students and keeps it in
//! sync with a flat JSON file. Every mutating operation rewrites the file
//! before returning, so the durable state never lags the in-memory state.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::Student;

/// The student roster and its persistence file binding.
///
/// Records are kept in insertion order; sorted views are produced on
/// demand and never reorder the collection itself.
#[derive(Debug)]
pub struct Store {
    /// Path to the roster file.
    path: PathBuf,
    /// All students, in load/add order.
    students: Vec<Student>,
}

impl Store {
    /// Open a store backed by the roster file at the given path.
    ///
    /// A missing file is a valid initial state and yields an empty roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    /// Malformed content is fatal for this operation; no partial recovery
    /// is attempted.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let students = if path.exists() {
            debug!("Loading roster from {}", path.display());
            let raw = fs::read_to_string(&path).map_err(|source| Error::StoreOpen {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str::<Vec<Student>>(&raw).map_err(|source| Error::StoreParse {
                path: path.clone(),
                source,
            })?
        } else {
            debug!("No roster file at {}, starting empty", path.display());
            Vec::new()
        };

        info!(
            "Roster opened with {} students at {}",
            students.len(),
            path.display()
        );
        Ok(Self { path, students })
    }

    /// Get the path to the roster file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of students in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Check whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// All students in insertion order.
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Look up a student by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Add a student to the roster and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateId`] if a student with the same ID is
    /// already present; the collection and the file are left unchanged.
    /// Returns a storage error if persisting fails.
    pub fn add(&mut self, student: Student) -> Result<()> {
        if self.students.iter().any(|s| s.id == student.id) {
            return Err(Error::duplicate_id(&student.id));
        }

        debug!("Adding student {} ({})", student.name, student.id);
        self.students.push(student);
        self.persist()?;
        Ok(())
    }

    /// Set or overwrite a mark for the student with the given ID, persist,
    /// and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudentNotFound`] if no student has the given ID;
    /// the collection and the file are left unchanged. Returns a storage
    /// error if persisting fails.
    pub fn update_marks(&mut self, id: &str, subject: &str, score: u32) -> Result<&Student> {
        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::not_found(id))?;

        self.students[index].set_mark(subject, score);
        self.persist()?;
        debug!("Updated {subject} mark for student {id}");
        Ok(&self.students[index])
    }

    /// Remove the student with the given ID, persist, and return the
    /// removed record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudentNotFound`] if no student has the given ID;
    /// the collection and the file are left unchanged. Returns a storage
    /// error if persisting fails.
    pub fn delete(&mut self, id: &str) -> Result<Student> {
        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::not_found(id))?;

        let removed = self.students.remove(index);
        self.persist()?;
        debug!("Deleted student {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// The student with the highest average mark, or `None` for an empty
    /// roster.
    ///
    /// Ties go to the first student encountered in a single left-to-right
    /// scan, so the result is deterministic given the collection order.
    #[must_use]
    pub fn top_by_average(&self) -> Option<&Student> {
        let mut best: Option<(&Student, f64)> = None;
        for student in &self.students {
            let average = student.average();
            match best {
                Some((_, best_average)) if average <= best_average => {}
                _ => best = Some((student, average)),
            }
        }
        best.map(|(student, _)| student)
    }

    /// All students ordered by department, then name (both ascending).
    ///
    /// The sort is stable: students sharing department and name keep their
    /// relative insertion order. This is a read-only view and never
    /// reorders the store.
    #[must_use]
    pub fn list_sorted(&self) -> Vec<&Student> {
        let mut view: Vec<&Student> = self.students.iter().collect();
        view.sort_by(|a, b| {
            a.department
                .cmp(&b.department)
                .then_with(|| a.name.cmp(&b.name))
        });
        view
    }

    /// Get roster statistics.
    #[must_use]
    pub fn stats(&self) -> RosterStats {
        let departments = self
            .students
            .iter()
            .map(|s| s.department.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let file_size_bytes = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);

        RosterStats {
            total_students: self.students.len(),
            departments,
            file_size_bytes,
        }
    }

    /// Rewrite the roster file to exactly reflect the in-memory collection.
    ///
    /// The serialized form is written to a temporary file beside the target
    /// and renamed into place, so a reader never observes a half-written
    /// file under normal operation.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.students)?;
        let tmp_path = self.path.with_extension("tmp");

        fs::write(&tmp_path, json).map_err(|source| Error::StorePersist {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| Error::StorePersist {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            "Persisted {} students to {}",
            self.students.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Statistics about the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    /// Total number of students in the roster.
    pub total_students: usize,
    /// Number of distinct departments.
    pub departments: usize,
    /// Size of the roster file in bytes (0 if it doesn't exist yet).
    pub file_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn test_roster_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rosterbook_test_{}_{tag}.json", std::process::id()))
    }

    fn student(id: &str, name: &str, department: &str, marks: &[(&str, u32)]) -> Student {
        let marks = marks
            .iter()
            .map(|&(subject, score)| (subject.to_string(), score))
            .collect::<BTreeMap<_, _>>();
        Student::new(id, name, 20, department, marks)
    }

    fn open_clean(tag: &str) -> Store {
        let path = test_roster_path(tag);
        let _ = fs::remove_file(&path);
        Store::open(&path).expect("failed to open test store")
    }

    fn cleanup(store: &Store) {
        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let store = open_clean("missing");
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_add_and_get() {
        let mut store = open_clean("add_get");

        store.add(student("s1", "Ada", "CS", &[("math", 90)])).unwrap();

        assert_eq!(store.len(), 1);
        let found = store.get("s1").unwrap();
        assert_eq!(found.name, "Ada");
        assert_eq!(found.mark("math"), Some(90));
        assert!(store.get("s2").is_none());

        cleanup(&store);
    }

    #[test]
    fn test_add_duplicate_id_rejected() {
        let mut store = open_clean("dup");

        store.add(student("s1", "Ada", "CS", &[])).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.add(student("s1", "Bob", "EE", &[])).unwrap_err();
        assert!(err.is_duplicate_id());

        // Neither the collection nor the file changed.
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("s1").unwrap().name, "Ada");
        let after = fs::read_to_string(store.path()).unwrap();
        assert_eq!(before, after);

        cleanup(&store);
    }

    #[test]
    fn test_reload_matches_memory_after_mutations() {
        let path = test_roster_path("reload");
        let _ = fs::remove_file(&path);

        let mut store = Store::open(&path).unwrap();
        store.add(student("s1", "Ada", "CS", &[("math", 80)])).unwrap();
        store.add(student("s2", "Bob", "EE", &[("circuits", 70)])).unwrap();
        store.update_marks("s1", "sci", 90).unwrap();
        store.delete("s2").unwrap();

        let reloaded = Store::open(&path).unwrap();
        assert_eq!(reloaded.students(), store.students());

        cleanup(&store);
    }

    #[test]
    fn test_update_marks_overwrites_existing_subject() {
        let mut store = open_clean("update_overwrite");
        store.add(student("s1", "Ada", "CS", &[("math", 50)])).unwrap();

        let updated = store.update_marks("s1", "math", 95).unwrap();
        assert_eq!(updated.mark("math"), Some(95));

        cleanup(&store);
    }

    #[test]
    fn test_update_marks_inserts_new_subject() {
        let mut store = open_clean("update_insert");
        store.add(student("s1", "Ada", "CS", &[("math", 85)])).unwrap();

        let updated = store.update_marks("s1", "art", 75).unwrap();
        assert_eq!(updated.mark("art"), Some(75));
        assert!((updated.average() - 80.0).abs() < f64::EPSILON);

        cleanup(&store);
    }

    #[test]
    fn test_update_marks_unknown_id() {
        let mut store = open_clean("update_missing");
        store.add(student("s1", "Ada", "CS", &[])).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.update_marks("s9", "math", 50).unwrap_err();
        assert!(err.is_not_found());

        let after = fs::read_to_string(store.path()).unwrap();
        assert_eq!(before, after);

        cleanup(&store);
    }

    #[test]
    fn test_delete_returns_removed_student() {
        let mut store = open_clean("delete");
        store.add(student("s1", "Ada", "CS", &[])).unwrap();
        store.add(student("s2", "Bob", "EE", &[])).unwrap();

        let removed = store.delete("s1").unwrap();
        assert_eq!(removed.name, "Ada");
        assert_eq!(store.len(), 1);
        assert!(store.get("s1").is_none());

        cleanup(&store);
    }

    #[test]
    fn test_delete_miss_leaves_file_unchanged() {
        let mut store = open_clean("delete_miss");
        store.add(student("s1", "Ada", "CS", &[])).unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = store.delete("s9").unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(store.len(), 1);
        let after = fs::read(store.path()).unwrap();
        assert_eq!(before, after);

        cleanup(&store);
    }

    #[test]
    fn test_top_by_average_empty_roster() {
        let store = open_clean("top_empty");
        assert!(store.top_by_average().is_none());
    }

    #[test]
    fn test_top_by_average_first_maximum_wins() {
        let mut store = open_clean("top_tie");
        store.add(student("a", "A", "CS", &[("math", 70)])).unwrap();
        store.add(student("b", "B", "CS", &[("math", 90)])).unwrap();
        store.add(student("c", "C", "CS", &[("math", 90)])).unwrap();

        // B and C tie at 90; B was inserted first and must win.
        let top = store.top_by_average().unwrap();
        assert_eq!(top.id, "b");

        cleanup(&store);
    }

    #[test]
    fn test_top_by_average_markless_students() {
        let mut store = open_clean("top_markless");
        store.add(student("s1", "Ada", "CS", &[])).unwrap();
        store.add(student("s2", "Bob", "EE", &[("math", 1)])).unwrap();

        let top = store.top_by_average().unwrap();
        assert_eq!(top.id, "s2");

        cleanup(&store);
    }

    #[test]
    fn test_list_sorted_by_department_then_name() {
        let mut store = open_clean("sorted");
        store.add(student("s1", "Bob", "CS", &[])).unwrap();
        store.add(student("s2", "Ann", "EE", &[])).unwrap();
        store.add(student("s3", "Alice", "CS", &[])).unwrap();

        let listed = store.list_sorted();
        let order: Vec<(&str, &str)> = listed
            .iter()
            .map(|s| (s.department.as_str(), s.name.as_str()))
            .collect();
        assert_eq!(order, vec![("CS", "Alice"), ("CS", "Bob"), ("EE", "Ann")]);

        // The store's own ordering is untouched.
        let insertion: Vec<&str> = store.students().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(insertion, vec!["s1", "s2", "s3"]);

        cleanup(&store);
    }

    #[test]
    fn test_list_sorted_empty_roster() {
        let store = open_clean("sorted_empty");
        assert!(store.list_sorted().is_empty());
    }

    #[test]
    fn test_open_malformed_file_is_fatal() {
        let path = test_roster_path("malformed");
        fs::write(&path, "this is not json").unwrap();

        let err = Store::open(&path).unwrap_err();
        assert!(matches!(err, Error::StoreParse { .. }));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_open_preserves_file_order() {
        let path = test_roster_path("file_order");
        let _ = fs::remove_file(&path);

        let mut store = Store::open(&path).unwrap();
        store.add(student("z", "Zoe", "EE", &[])).unwrap();
        store.add(student("a", "Ada", "CS", &[])).unwrap();

        let reloaded = Store::open(&path).unwrap();
        let ids: Vec<&str> = reloaded.students().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a"]);

        cleanup(&store);
    }

    #[test]
    fn test_persist_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("rosterbook_test_{}_nested", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("deep").join("roster.json");

        let mut store = Store::open(&path).unwrap();
        store.add(student("s1", "Ada", "CS", &[])).unwrap();
        assert!(path.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_stats() {
        let mut store = open_clean("stats");
        assert_eq!(
            store.stats(),
            RosterStats {
                total_students: 0,
                departments: 0,
                file_size_bytes: 0,
            }
        );

        store.add(student("s1", "Ada", "CS", &[])).unwrap();
        store.add(student("s2", "Bob", "CS", &[])).unwrap();
        store.add(student("s3", "Eve", "EE", &[])).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.departments, 2);
        assert!(stats.file_size_bytes > 0);

        cleanup(&store);
    }

    #[test]
    fn test_no_leftover_temp_file_after_persist() {
        let mut store = open_clean("tmpfile");
        store.add(student("s1", "Ada", "CS", &[])).unwrap();

        assert!(!store.path().with_extension("tmp").exists());

        cleanup(&store);
    }

    #[test]
    fn test_path() {
        let path = test_roster_path("path");
        let _ = fs::remove_file(&path);
        let store = Store::open(&path).unwrap();
        assert_eq!(store.path(), path);
    }
}
