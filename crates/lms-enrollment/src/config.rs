//! Enrollment service configuration.

use serde::{Deserialize, Serialize};

/// Mode given to enrollments created without an explicit mode.
pub const DEFAULT_MODE: &str = "honor";

/// Settings for [`EnrollmentService`](crate::EnrollmentService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentConfig {
    /// Mode used when none is requested. Also accepted for courses that
    /// have no configured modes.
    pub default_mode: String,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            default_mode: DEFAULT_MODE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_honor() {
        let config: EnrollmentConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.default_mode, "honor");
    }
}
