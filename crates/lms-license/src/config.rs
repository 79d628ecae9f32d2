//! License configuration.

use serde::{Deserialize, Serialize};

use crate::license::{License, CC_IMAGE_BASE};

/// Creative Commons version assumed when a stored license has none.
pub const DEFAULT_CC_VERSION: &str = "4.0";

/// Settings used when parsing licenses and building badge URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    /// Version given to Creative Commons licenses stored without one.
    pub default_cc_version: String,
    /// Base URL of the Creative Commons badge images.
    pub image_base_url: String,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            default_cc_version: DEFAULT_CC_VERSION.to_string(),
            image_base_url: CC_IMAGE_BASE.to_string(),
        }
    }
}

impl LicenseConfig {
    /// Badge image source for `license` under the configured image base.
    ///
    /// `big` selects the 88x31 badge, otherwise the 80x15 one. All Rights
    /// Reserved has no badge.
    pub fn image_src(&self, license: &License, big: bool) -> Option<String> {
        let path = license.creative_commons()?.image_path();
        Some(format!(
            "{}/{}/{}.png",
            self.image_base_url.trim_end_matches('/'),
            path.trim_end_matches('/'),
            badge_size(big)
        ))
    }
}

pub(crate) fn badge_size(big: bool) -> &'static str {
    if big {
        "88x31"
    } else {
        "80x15"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_partial_yaml() {
        let config: LicenseConfig = serde_yaml::from_str("default_cc_version: '3.0'\n").unwrap();
        assert_eq!(config.default_cc_version, "3.0");
        assert_eq!(config.image_base_url, CC_IMAGE_BASE);
    }

    #[test]
    fn image_src_uses_configured_base() {
        let config = LicenseConfig {
            image_base_url: "https://static.example.org/cc/".to_string(),
            ..LicenseConfig::default()
        };
        let license = License::parse("CC-BY-SA", Some("4.0"), &config).unwrap().unwrap();
        assert_eq!(
            config.image_src(&license, true).as_deref(),
            Some("https://static.example.org/cc/by-sa/4.0/88x31.png")
        );
        let arr = License::parse("ARR", None, &config).unwrap().unwrap();
        assert!(config.image_src(&arr, false).is_none());
    }
}
