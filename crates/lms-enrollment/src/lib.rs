//! # lms-enrollment — Course Enrollment API
//!
//! Enrollment operations for learners: list a user's enrollments, fetch
//! one, enroll in a course, change the mode or active flag of an existing
//! enrollment, and read a course's enrollment settings (available modes,
//! enrollment window, invite-only flag).
//!
//! ## Architecture
//!
//! [`EnrollmentService`] holds the business rules (course-mode validation,
//! defaults, not-found handling) and delegates storage to an
//! [`EnrollmentDataApi`] implementation chosen by the caller.
//! [`InMemoryEnrollmentStore`] is the bundled backend.
//!
//! ```text
//! caller ──▶ authorize(requester, student)
//!        ──▶ EnrollmentService<D> ──▶ D: EnrollmentDataApi
//!                                   └── InMemoryEnrollmentStore (DashMap)
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use config::EnrollmentConfig;
pub use data::EnrollmentDataApi;
pub use error::EnrollmentError;
pub use service::{authorize, EnrollmentService, EnrollmentUpdate};
pub use store::InMemoryEnrollmentStore;
pub use types::{CourseEnrollmentInfo, CourseMode, Enrollment};
