//! # Enrollment Errors

use thiserror::Error;

use lms_core::{CourseId, Username};

use crate::types::CourseEnrollmentInfo;

/// Errors from enrollment operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    /// The requested mode is not offered by the course. Carries the
    /// course's enrollment settings so callers can show valid choices.
    #[error("{message}")]
    CourseModeNotFound {
        /// Description naming the requested and available modes.
        message: String,
        /// The course's enrollment settings.
        course_info: Box<CourseEnrollmentInfo>,
    },

    /// No enrollment exists for the user in the course.
    #[error("course enrollment not found for user {user} in course {course}")]
    EnrollmentNotFound {
        /// The user.
        user: Username,
        /// The course.
        course: CourseId,
    },

    /// The course does not exist.
    #[error("course {course} not found")]
    CourseNotFound {
        /// The missing course.
        course: CourseId,
    },

    /// The requester may not act on another user's enrollments.
    #[error("user {requester} may not access enrollments of {student}")]
    Unauthorized {
        /// The authenticated user.
        requester: Username,
        /// The user whose enrollments were requested.
        student: Username,
    },

    /// The data backend failed.
    #[error("enrollment data backend error: {0}")]
    Backend(String),
}

impl EnrollmentError {
    /// Course settings attached to the error, if any.
    pub fn course_info(&self) -> Option<&CourseEnrollmentInfo> {
        match self {
            Self::CourseModeNotFound { course_info, .. } => Some(&**course_info),
            _ => None,
        }
    }
}
