//! In-memory enrollment backend using DashMap.
//!
//! Courses and enrollments each get their own map; enrollments are keyed
//! by `(user, course)` and joined with the course settings on read.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use lms_core::{CourseId, Timestamp, Username};

use crate::data::EnrollmentDataApi;
use crate::error::EnrollmentError;
use crate::types::{CourseEnrollmentInfo, Enrollment};

#[derive(Debug, Clone)]
struct EnrollmentRow {
    created: Timestamp,
    mode: String,
    is_active: bool,
}

struct Inner {
    courses: DashMap<CourseId, CourseEnrollmentInfo>,
    enrollments: DashMap<(Username, CourseId), EnrollmentRow>,
}

/// DashMap-backed [`EnrollmentDataApi`].
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct InMemoryEnrollmentStore {
    inner: Arc<Inner>,
}

impl Default for InMemoryEnrollmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEnrollmentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                courses: DashMap::new(),
                enrollments: DashMap::new(),
            }),
        }
    }

    /// Register or replace a course's enrollment settings.
    pub fn upsert_course(&self, info: CourseEnrollmentInfo) {
        self.inner.courses.insert(info.course_id.clone(), info);
    }

    /// Number of registered courses.
    pub fn course_count(&self) -> usize {
        self.inner.courses.len()
    }

    /// Number of stored enrollments, active or not.
    pub fn enrollment_count(&self) -> usize {
        self.inner.enrollments.len()
    }

    fn course(&self, course: &CourseId) -> Result<CourseEnrollmentInfo, EnrollmentError> {
        self.inner
            .courses
            .get(course)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| EnrollmentError::CourseNotFound {
                course: course.clone(),
            })
    }

    fn assemble(&self, user: &Username, course: &CourseId, row: &EnrollmentRow) -> Result<Enrollment, EnrollmentError> {
        Ok(Enrollment {
            created: row.created,
            mode: row.mode.clone(),
            is_active: row.is_active,
            user: user.clone(),
            course: self.course(course)?,
        })
    }
}

impl std::fmt::Debug for InMemoryEnrollmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEnrollmentStore")
            .field("courses", &self.course_count())
            .field("enrollments", &self.enrollment_count())
            .finish()
    }
}

impl EnrollmentDataApi for InMemoryEnrollmentStore {
    fn get_course_enrollments(&self, user: &Username) -> Result<Vec<Enrollment>, EnrollmentError> {
        let rows: Vec<(CourseId, EnrollmentRow)> = self
            .inner
            .enrollments
            .iter()
            .filter(|entry| &entry.key().0 == user)
            .map(|entry| (entry.key().1.clone(), entry.value().clone()))
            .collect();
        let mut enrollments = rows
            .iter()
            .map(|(course, row)| self.assemble(user, course, row))
            .collect::<Result<Vec<_>, _>>()?;
        enrollments.sort_by(|a, b| a.course.course_id.cmp(&b.course.course_id));
        Ok(enrollments)
    }

    fn get_course_enrollment(
        &self,
        user: &Username,
        course: &CourseId,
    ) -> Result<Option<Enrollment>, EnrollmentError> {
        let row = self
            .inner
            .enrollments
            .get(&(user.clone(), course.clone()))
            .map(|entry| entry.value().clone());
        row.map(|row| self.assemble(user, course, &row)).transpose()
    }

    fn create_course_enrollment(
        &self,
        user: &Username,
        course: &CourseId,
        mode: &str,
        is_active: bool,
    ) -> Result<Enrollment, EnrollmentError> {
        let info = self.course(course)?;
        let row = {
            let mut entry = self
                .inner
                .enrollments
                .entry((user.clone(), course.clone()))
                .or_insert_with(|| EnrollmentRow {
                    created: Timestamp::now(),
                    mode: mode.to_string(),
                    is_active,
                });
            entry.mode = mode.to_string();
            entry.is_active = is_active;
            entry.value().clone()
        };
        debug!(user = %user, course = %course, mode, is_active, "enrollment stored");
        Ok(Enrollment {
            created: row.created,
            mode: row.mode,
            is_active: row.is_active,
            user: user.clone(),
            course: info,
        })
    }

    fn update_course_enrollment(
        &self,
        user: &Username,
        course: &CourseId,
        mode: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<Enrollment>, EnrollmentError> {
        let row = {
            let Some(mut entry) = self.inner.enrollments.get_mut(&(user.clone(), course.clone()))
            else {
                return Ok(None);
            };
            if let Some(mode) = mode {
                entry.mode = mode.to_string();
            }
            if let Some(is_active) = is_active {
                entry.is_active = is_active;
            }
            entry.value().clone()
        };
        self.assemble(user, course, &row).map(Some)
    }

    fn get_course_enrollment_info(
        &self,
        course: &CourseId,
    ) -> Result<CourseEnrollmentInfo, EnrollmentError> {
        self.course(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseMode;

    fn user(s: &str) -> Username {
        Username::new(s).unwrap()
    }

    fn course(s: &str) -> CourseId {
        CourseId::new(s).unwrap()
    }

    fn store() -> InMemoryEnrollmentStore {
        let store = InMemoryEnrollmentStore::new();
        store.upsert_course(
            CourseEnrollmentInfo::new(course("edX/DemoX/2014T2")).with_mode(CourseMode::honor()),
        );
        store.upsert_course(CourseEnrollmentInfo::new(course("edX/edX-Insider/2014T2")));
        store
    }

    #[test]
    fn create_then_get() {
        let store = store();
        let created = store
            .create_course_enrollment(&user("Bob"), &course("edX/DemoX/2014T2"), "honor", true)
            .unwrap();
        let fetched = store
            .get_course_enrollment(&user("Bob"), &course("edX/DemoX/2014T2"))
            .unwrap()
            .unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.course.available_modes(), vec!["honor"]);
    }

    #[test]
    fn re_enrolling_keeps_creation_time() {
        let store = store();
        let first = store
            .create_course_enrollment(&user("Bob"), &course("edX/DemoX/2014T2"), "honor", true)
            .unwrap();
        let second = store
            .create_course_enrollment(&user("Bob"), &course("edX/DemoX/2014T2"), "audit", false)
            .unwrap();
        assert_eq!(first.created, second.created);
        assert_eq!(second.mode, "audit");
        assert!(!second.is_active);
        assert_eq!(store.enrollment_count(), 1);
    }

    #[test]
    fn create_in_unknown_course_fails() {
        let err = store()
            .create_course_enrollment(&user("Bob"), &course("edX/Nope/2014"), "honor", true)
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::CourseNotFound { .. }));
    }

    #[test]
    fn update_missing_returns_none() {
        let updated = store()
            .update_course_enrollment(&user("Bob"), &course("edX/DemoX/2014T2"), Some("honor"), None)
            .unwrap();
        assert!(updated.is_none());
    }

    #[test]
    fn enrollments_are_per_user_and_sorted() {
        let store = store();
        for c in ["edX/edX-Insider/2014T2", "edX/DemoX/2014T2"] {
            store
                .create_course_enrollment(&user("Bob"), &course(c), "honor", true)
                .unwrap();
        }
        store
            .create_course_enrollment(&user("Alice"), &course("edX/DemoX/2014T2"), "honor", true)
            .unwrap();
        let bob: Vec<String> = store
            .get_course_enrollments(&user("Bob"))
            .unwrap()
            .into_iter()
            .map(|e| e.course.course_id.to_string())
            .collect();
        assert_eq!(bob, vec!["edX/DemoX/2014T2", "edX/edX-Insider/2014T2"]);
    }

    #[test]
    fn clones_share_data() {
        let store = store();
        let clone = store.clone();
        clone
            .create_course_enrollment(&user("Bob"), &course("edX/DemoX/2014T2"), "honor", true)
            .unwrap();
        assert_eq!(store.enrollment_count(), 1);
    }
}
