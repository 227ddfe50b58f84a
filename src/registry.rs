//! Subject registry
//!
//! The in-memory collection of subjects. Timetable cells refer to subjects by
//! name, so the registry keeps a name index next to the subjects; when two
//! subjects share a name the first one in collection order wins.

use std::collections::HashMap;

use crate::models::Subject;

#[derive(Debug, Clone, Default)]
pub struct SubjectRegistry {
    subjects: Vec<Subject>,
    by_name: HashMap<String, usize>,
}

impl SubjectRegistry {
    pub fn new(subjects: Vec<Subject>) -> Self {
        let mut registry = Self { subjects, by_name: HashMap::new() };
        registry.reindex();
        registry
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        for (i, subject) in self.subjects.iter().enumerate() {
            self.by_name.entry(subject.get_name()).or_insert(i);
        }
    }

    pub fn all(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.get_id() == id)
    }

    /// Exact, case-sensitive lookup
    pub fn get_by_name(&self, name: &str) -> Option<&Subject> {
        self.by_name.get(name).map(|&i| &self.subjects[i])
    }

    /// Replaces the subject with the same id, or appends it
    pub fn upsert(&mut self, subject: Subject) {
        match self.subjects.iter().position(|s| s.get_id() == subject.get_id()) {
            Some(i) => self.subjects[i] = subject,
            None => self.subjects.push(subject),
        }
        self.reindex();
    }

    /// Removes a subject by id, returning it if it was present
    pub fn remove(&mut self, id: &str) -> Option<Subject> {
        let i = self.subjects.iter().position(|s| s.get_id() == id)?;
        let removed = self.subjects.remove(i);
        self.reindex();
        Some(removed)
    }
}
