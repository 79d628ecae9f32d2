//! # Enrollment Types
//!
//! Serializable views of courses and enrollments, shaped like the records
//! the LMS exchanges with its clients:
//!
//! ```json
//! {
//!   "created": "2014-10-20T20:18:00Z",
//!   "mode": "honor",
//!   "is_active": true,
//!   "user": "Bob",
//!   "course": {
//!     "course_id": "edX/DemoX/2014T2",
//!     "enrollment_start": "2014-10-15T20:18:00Z",
//!     "enrollment_end": "2014-12-20T20:18:00Z",
//!     "course_modes": [{"slug": "honor", "name": "Honor Code Certificate", ...}],
//!     "invite_only": false
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use lms_core::{CourseId, Timestamp, Username};

/// An enrollment track offered by a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMode {
    /// Mode identifier (`honor`, `audit`, `verified`, ...).
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Minimum price in the smallest currency unit.
    pub min_price: u32,
    /// Comma-separated suggested prices, possibly empty.
    #[serde(default)]
    pub suggested_prices: String,
    /// ISO currency code, lowercase.
    pub currency: String,
    /// When the mode stops being available.
    #[serde(default)]
    pub expiration_datetime: Option<Timestamp>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl CourseMode {
    /// A free mode with the given slug and name.
    pub fn free(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            min_price: 0,
            suggested_prices: String::new(),
            currency: "usd".to_string(),
            expiration_datetime: None,
            description: None,
        }
    }

    /// The free honor-code mode.
    pub fn honor() -> Self {
        Self::free("honor", "Honor Code Certificate")
    }

    /// Whether the mode has expired at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiration_datetime.is_some_and(|end| end <= now)
    }
}

/// Course-level enrollment settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEnrollmentInfo {
    /// Course key.
    pub course_id: CourseId,
    /// Enrollment opens.
    #[serde(default)]
    pub enrollment_start: Option<Timestamp>,
    /// Enrollment closes.
    #[serde(default)]
    pub enrollment_end: Option<Timestamp>,
    /// Modes learners can enroll in.
    #[serde(default)]
    pub course_modes: Vec<CourseMode>,
    /// Whether enrollment requires an invitation.
    #[serde(default)]
    pub invite_only: bool,
}

impl CourseEnrollmentInfo {
    /// A course with no enrollment window and no configured modes.
    pub fn new(course_id: CourseId) -> Self {
        Self {
            course_id,
            enrollment_start: None,
            enrollment_end: None,
            course_modes: Vec::new(),
            invite_only: false,
        }
    }

    /// Builder: add a course mode.
    pub fn with_mode(mut self, mode: CourseMode) -> Self {
        self.course_modes.push(mode);
        self
    }

    /// Slugs of the configured modes, in configured order.
    pub fn available_modes(&self) -> Vec<&str> {
        self.course_modes.iter().map(|m| m.slug.as_str()).collect()
    }

    /// Whether `slug` is a configured mode.
    pub fn has_mode(&self, slug: &str) -> bool {
        self.course_modes.iter().any(|m| m.slug == slug)
    }

    /// Whether enrollment is open at `now`. Missing bounds are open.
    pub fn is_enrollment_open(&self, now: Timestamp) -> bool {
        self.enrollment_start.map_or(true, |start| start <= now)
            && self.enrollment_end.map_or(true, |end| now < end)
    }
}

/// A user's enrollment in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// When the enrollment was first created.
    pub created: Timestamp,
    /// Enrollment mode slug.
    pub mode: String,
    /// Whether the enrollment is active.
    pub is_active: bool,
    /// Enrolled user.
    pub user: Username,
    /// The course's enrollment settings.
    pub course: CourseEnrollmentInfo,
}
