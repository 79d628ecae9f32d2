//! # lms-license — Content License Value Type
//!
//! A piece of content is either unlicensed, "All Rights Reserved", or
//! released under a Creative Commons license. This crate parses the
//! license codes stored on content (`ARR`, `CC0`, `CC-BY-NC-SA`, ...),
//! round-trips them through the `{"license", "version"}` record, and
//! derives the static Creative Commons attributes: badge image, deed page
//! and REST API query.
//!
//! URLs are built, never fetched. A Creative Commons license stored
//! without a version takes the configured default version.

pub mod config;
pub mod license;

pub use config::LicenseConfig;
pub use license::{CcLicense, License, LicenseError, LicenseRecord};
