//! # Enrollment Service
//!
//! Business rules on top of an [`EnrollmentDataApi`] backend.
//!
//! ## Course-Mode Validation
//!
//! Adding an enrollment, and updating one with a new mode, first checks
//! that the mode is offered by the course. The configured default mode is
//! also accepted for courses that have no modes configured at all. A
//! rejected mode is logged at `warn` and returned as
//! [`EnrollmentError::CourseModeNotFound`] carrying the course settings.

use tracing::{info, warn};

use lms_core::{CourseId, Username};

use crate::config::EnrollmentConfig;
use crate::data::EnrollmentDataApi;
use crate::error::EnrollmentError;
use crate::types::{CourseEnrollmentInfo, Enrollment};

/// Changes requested for an existing enrollment. Unset fields are left
/// as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentUpdate {
    /// New mode slug.
    pub mode: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl EnrollmentUpdate {
    /// Change the mode.
    pub fn mode(mode: impl Into<String>) -> Self {
        Self {
            mode: Some(mode.into()),
            is_active: None,
        }
    }

    /// Change the active flag.
    pub fn active(is_active: bool) -> Self {
        Self {
            mode: None,
            is_active: Some(is_active),
        }
    }
}

/// Reject requests where the authenticated user acts on someone else's
/// enrollments.
pub fn authorize(requester: &Username, student: &Username) -> Result<(), EnrollmentError> {
    if requester == student {
        Ok(())
    } else {
        warn!(requester = %requester, student = %student, "enrollment access denied");
        Err(EnrollmentError::Unauthorized {
            requester: requester.clone(),
            student: student.clone(),
        })
    }
}

/// Enrollment operations over a data backend.
#[derive(Debug, Clone)]
pub struct EnrollmentService<D> {
    data: D,
    config: EnrollmentConfig,
}

impl<D: EnrollmentDataApi> EnrollmentService<D> {
    /// Service with the default configuration.
    pub fn new(data: D) -> Self {
        Self::with_config(data, EnrollmentConfig::default())
    }

    /// Service with an explicit configuration.
    pub fn with_config(data: D, config: EnrollmentConfig) -> Self {
        Self { data, config }
    }

    /// The data backend.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Every enrollment of `user`.
    pub fn get_enrollments(&self, user: &Username) -> Result<Vec<Enrollment>, EnrollmentError> {
        self.data.get_course_enrollments(user)
    }

    /// The enrollment of `user` in `course`, if any.
    pub fn get_enrollment(
        &self,
        user: &Username,
        course: &CourseId,
    ) -> Result<Option<Enrollment>, EnrollmentError> {
        self.data.get_course_enrollment(user, course)
    }

    /// Enroll `user` in `course`.
    ///
    /// `mode` defaults to [`EnrollmentConfig::default_mode`].
    pub fn add_enrollment(
        &self,
        user: &Username,
        course: &CourseId,
        mode: Option<&str>,
        is_active: bool,
    ) -> Result<Enrollment, EnrollmentError> {
        let mode = mode.unwrap_or(self.config.default_mode.as_str());
        self.validate_course_mode(course, mode)?;
        let enrollment = self
            .data
            .create_course_enrollment(user, course, mode, is_active)?;
        info!(user = %user, course = %course, mode, "user enrolled");
        Ok(enrollment)
    }

    /// Apply `update` to the existing enrollment of `user` in `course`.
    ///
    /// # Errors
    ///
    /// - [`EnrollmentError::CourseModeNotFound`] if a new mode is requested
    ///   and the course does not offer it.
    /// - [`EnrollmentError::EnrollmentNotFound`] if there is no enrollment.
    pub fn update_enrollment(
        &self,
        user: &Username,
        course: &CourseId,
        update: EnrollmentUpdate,
    ) -> Result<Enrollment, EnrollmentError> {
        if let Some(mode) = update.mode.as_deref() {
            self.validate_course_mode(course, mode)?;
        }
        self.data
            .update_course_enrollment(user, course, update.mode.as_deref(), update.is_active)?
            .ok_or_else(|| EnrollmentError::EnrollmentNotFound {
                user: user.clone(),
                course: course.clone(),
            })
    }

    /// Enrollment settings of `course`.
    pub fn get_course_enrollment_details(
        &self,
        course: &CourseId,
    ) -> Result<CourseEnrollmentInfo, EnrollmentError> {
        self.data.get_course_enrollment_info(course)
    }

    fn validate_course_mode(&self, course: &CourseId, mode: &str) -> Result<(), EnrollmentError> {
        let info = self.data.get_course_enrollment_info(course)?;
        if info.has_mode(mode) {
            return Ok(());
        }
        if info.course_modes.is_empty() && mode == self.config.default_mode {
            return Ok(());
        }
        let message = format!(
            "Specified course mode '{mode}' unavailable for course {course}. Available modes were: {}",
            info.available_modes().join(", ")
        );
        warn!(course = %course, mode, "{message}");
        Err(EnrollmentError::CourseModeNotFound {
            message,
            course_info: Box::new(info),
        })
    }
}
