//! Feedback storage.
//!
//! Entries are grouped per course and carry a service-wide id. The in-memory
//! store starts with a handful of sample entries so the catalog is never empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use utoipa::ToSchema;

pub const ANONYMOUS_USER: &str = "anonymous";

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: u64,
    pub course_id: u64,
    pub user: String,
    pub comment: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Validated submission, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub user: String,
    pub comment: String,
    pub rating: u8,
    pub teacher: Option<String>,
    pub group: Option<String>,
    pub lang: Option<String>,
}

/// Moderation edit; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackPatch {
    pub comment: Option<String>,
    pub rating: Option<u8>,
}

pub trait FeedbackStore: Send + Sync {
    /// Entries for one course in insertion order; unknown courses yield nothing.
    fn list(&self, course_id: u64) -> Vec<FeedbackEntry>;

    /// Every entry, ordered by course then insertion.
    fn list_all(&self) -> Vec<FeedbackEntry>;

    fn add(&self, course_id: u64, feedback: NewFeedback) -> FeedbackEntry;

    /// Apply `patch`, returning the updated entry or `None` if it does not exist.
    fn update(&self, course_id: u64, id: u64, patch: FeedbackPatch) -> Option<FeedbackEntry>;

    /// Returns `false` when there was nothing to delete.
    fn remove(&self, course_id: u64, id: u64) -> bool;
}

#[derive(Debug, Default)]
struct FeedbackBook {
    next_id: u64,
    by_course: BTreeMap<u64, Vec<FeedbackEntry>>,
}

#[derive(Debug, Default)]
pub struct MemoryFeedbackStore {
    book: RwLock<FeedbackBook>,
}

impl MemoryFeedbackStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            book: RwLock::new(FeedbackBook {
                next_id: 1,
                by_course: BTreeMap::new(),
            }),
        }
    }

    /// Store preloaded with the sample entries for courses 1 and 2.
    #[must_use]
    pub fn seeded() -> Self {
        let store = Self::new();
        for (course_id, comment, rating) in [
            (1, "Great course!", 9),
            (1, "Challenging but useful.", 8),
            (2, "Too theoretical.", 6),
            (2, "Loved the experiments!", 10),
        ] {
            store.add(
                course_id,
                NewFeedback {
                    user: ANONYMOUS_USER.to_string(),
                    comment: comment.to_string(),
                    rating,
                    teacher: None,
                    group: None,
                    lang: None,
                },
            );
        }
        store
    }
}

impl FeedbackStore for MemoryFeedbackStore {
    fn list(&self, course_id: u64) -> Vec<FeedbackEntry> {
        self.book
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_course
            .get(&course_id)
            .cloned()
            .unwrap_or_default()
    }

    fn list_all(&self) -> Vec<FeedbackEntry> {
        self.book
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_course
            .values()
            .flatten()
            .cloned()
            .collect()
    }

    fn add(&self, course_id: u64, feedback: NewFeedback) -> FeedbackEntry {
        let mut book = self.book.write().unwrap_or_else(PoisonError::into_inner);
        let id = book.next_id;
        book.next_id += 1;
        let entry = FeedbackEntry {
            id,
            course_id,
            user: feedback.user,
            comment: feedback.comment,
            rating: feedback.rating,
            teacher: feedback.teacher,
            group: feedback.group,
            lang: feedback.lang,
        };
        book.by_course
            .entry(course_id)
            .or_default()
            .push(entry.clone());
        entry
    }

    fn update(&self, course_id: u64, id: u64, patch: FeedbackPatch) -> Option<FeedbackEntry> {
        let mut book = self.book.write().unwrap_or_else(PoisonError::into_inner);
        let entry = book
            .by_course
            .get_mut(&course_id)?
            .iter_mut()
            .find(|entry| entry.id == id)?;
        if let Some(comment) = patch.comment {
            entry.comment = comment;
        }
        if let Some(rating) = patch.rating {
            entry.rating = rating;
        }
        Some(entry.clone())
    }

    fn remove(&self, course_id: u64, id: u64) -> bool {
        let mut book = self.book.write().unwrap_or_else(PoisonError::into_inner);
        let Some(entries) = book.by_course.get_mut(&course_id) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(comment: &str, rating: u8) -> NewFeedback {
        NewFeedback {
            user: "a@gmail.com".to_string(),
            comment: comment.to_string(),
            rating,
            teacher: Some("John Miller".to_string()),
            group: None,
            lang: Some("en".to_string()),
        }
    }

    #[test]
    fn seeded_store_has_sample_entries() {
        let store = MemoryFeedbackStore::seeded();
        let math: Vec<(u64, String, u8)> = store
            .list(1)
            .into_iter()
            .map(|entry| (entry.id, entry.comment, entry.rating))
            .collect();
        assert_eq!(
            math,
            [
                (1, "Great course!".to_string(), 9),
                (2, "Challenging but useful.".to_string(), 8),
            ]
        );
        assert_eq!(store.list(2).len(), 2);
        assert!(store.list(999).is_empty());
        assert_eq!(store.list_all().len(), 4);
    }

    #[test]
    fn add_assigns_increasing_ids() {
        let store = MemoryFeedbackStore::seeded();
        let first = store.add(2, submission("Clear lectures", 9));
        let second = store.add(1, submission("Too fast", 5));
        assert_eq!(first.id, 5);
        assert_eq!(second.id, 6);
        assert_eq!(store.list(2).last(), Some(&first));
    }

    #[test]
    fn update_changes_only_given_fields() {
        let store = MemoryFeedbackStore::seeded();
        let updated = store.update(
            1,
            2,
            FeedbackPatch {
                comment: None,
                rating: Some(3),
            },
        );
        let updated = updated.map(|entry| (entry.comment, entry.rating));
        assert_eq!(updated, Some(("Challenging but useful.".to_string(), 3)));
        assert_eq!(store.update(2, 1, FeedbackPatch::default()), None);
    }

    #[test]
    fn remove_reports_whether_anything_was_deleted() {
        let store = MemoryFeedbackStore::seeded();
        assert!(store.remove(2, 3));
        assert!(!store.remove(2, 3));
        assert!(!store.remove(42, 1));
        assert_eq!(store.list(2).len(), 1);
    }
}
