//! Data-access seam for enrollment storage.

use lms_core::{CourseId, Username};

use crate::error::EnrollmentError;
use crate::types::{CourseEnrollmentInfo, Enrollment};

/// Storage operations used by [`EnrollmentService`](crate::EnrollmentService).
///
/// Implementations perform no business validation; mode checks and
/// defaults live in the service. Methods take `&self` so a backend can be
/// shared across threads.
pub trait EnrollmentDataApi: Send + Sync {
    /// All enrollments of `user`, active or not.
    fn get_course_enrollments(&self, user: &Username) -> Result<Vec<Enrollment>, EnrollmentError>;

    /// The enrollment of `user` in `course`, if one exists.
    fn get_course_enrollment(
        &self,
        user: &Username,
        course: &CourseId,
    ) -> Result<Option<Enrollment>, EnrollmentError>;

    /// Create the enrollment, or update mode and active flag of an existing
    /// one (keeping its creation time).
    fn create_course_enrollment(
        &self,
        user: &Username,
        course: &CourseId,
        mode: &str,
        is_active: bool,
    ) -> Result<Enrollment, EnrollmentError>;

    /// Apply the given changes to an existing enrollment. Returns `None`
    /// when there is no enrollment to update.
    fn update_course_enrollment(
        &self,
        user: &Username,
        course: &CourseId,
        mode: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<Enrollment>, EnrollmentError>;

    /// Enrollment settings of `course`.
    fn get_course_enrollment_info(
        &self,
        course: &CourseId,
    ) -> Result<CourseEnrollmentInfo, EnrollmentError>;
}
