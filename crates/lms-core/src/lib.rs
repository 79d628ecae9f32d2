//! # lms-core — Foundational Types for the LMS Platform Components
//!
//! Defines the identifier newtypes, timestamps and error hierarchy shared
//! by the access merger, the license value type and the enrollment API.
//! Every other crate in the workspace depends on `lms-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `PartitionId`, `GroupId`,
//!    `BlockId`, `CourseId`, `Username`. You cannot pass a group id where a
//!    partition id is expected.
//!
//! 2. **One id type end-to-end.** Partition and group ids are unsigned
//!    integers everywhere, including inside serialized documents. There is
//!    no string/integer key coercion at serialization boundaries.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `lms-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::LmsError;
pub use identity::{BlockId, CourseId, GroupId, PartitionId, Username};
pub use temporal::Timestamp;
