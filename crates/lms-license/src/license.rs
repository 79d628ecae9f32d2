//! # Content Licenses
//!
//! Licenses are stored on content as a short code plus an optional
//! version:
//!
//! | Code            | Meaning                                         |
//! |-----------------|-------------------------------------------------|
//! | `ARR`           | All Rights Reserved                             |
//! | `CC0`           | Creative Commons public domain dedication       |
//! | `CC-BY[-...]`   | Creative Commons with `NC`, `SA`, `ND` flags     |
//! | empty / null    | No license                                      |
//!
//! ## Record Format
//!
//! The stored form is `{"license": <code>, "version": <string|null>}`.
//! Parsing also accepts a bare code string.
//!
//! ## Creative Commons Attributes
//!
//! [`CcLicense::cc_attributes`] yields the `(class, commercial,
//! derivatives)` triple used by the Creative Commons REST API:
//! class `zero` or `standard`, commercial `y`/`n`, derivatives `y`/`sa`/`n`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{badge_size, LicenseConfig};

/// Base URL of the Creative Commons badge images.
pub const CC_IMAGE_BASE: &str = "http://i.creativecommons.org/l";
const CC_DEED_BASE: &str = "http://creativecommons.org/licenses";
const CC_ZERO_DEED: &str = "http://creativecommons.org/publicdomain/zero/1.0/";
const CC_API_BASE: &str = "http://api.creativecommons.org/rest/1.5/license";
const CC_ZERO_VERSION: &str = "1.0";

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from parsing a license code or record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseError {
    /// The code is not `ARR`, `CC0` or a `CC-BY` code.
    #[error("invalid license {code:?}")]
    Invalid {
        /// The rejected code.
        code: String,
    },

    /// A Creative Commons code carries an attribute other than BY/NC/SA/ND.
    #[error("unknown Creative Commons attribute {attribute:?} in {code:?}")]
    UnknownAttribute {
        /// The full code.
        code: String,
        /// The unrecognized token.
        attribute: String,
    },

    /// A Creative Commons code combines attributes that cannot coexist.
    #[error("conflicting Creative Commons attributes in {code:?}: {reason}")]
    ConflictingAttributes {
        /// The full code.
        code: String,
        /// Which attributes conflict.
        reason: &'static str,
    },

    /// A license record could not be decoded.
    #[error("malformed license record: {0}")]
    Record(String),
}

// ─── Creative Commons ────────────────────────────────────────────────

/// A Creative Commons license with its version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CcLicense {
    zero: bool,
    non_commercial: bool,
    share_alike: bool,
    no_derivatives: bool,
    version: String,
}

impl CcLicense {
    /// CC0 public domain dedication.
    pub fn zero() -> Self {
        Self {
            zero: true,
            non_commercial: false,
            share_alike: false,
            no_derivatives: false,
            version: CC_ZERO_VERSION.to_string(),
        }
    }

    /// Parse a Creative Commons code (`CC0` or `CC-BY[-NC][-SA|-ND]`).
    ///
    /// Attribute order after `BY` is not significant; [`code`](Self::code)
    /// always renders the canonical order.
    pub fn parse(code: &str, version: impl Into<String>) -> Result<Self, LicenseError> {
        let version = version.into();
        if code == "CC0" {
            return Ok(Self {
                version,
                ..Self::zero()
            });
        }
        let invalid = || LicenseError::Invalid {
            code: code.to_string(),
        };
        let mut tokens = code.strip_prefix("CC-").ok_or_else(invalid)?.split('-');
        if tokens.next() != Some("BY") {
            return Err(invalid());
        }

        let mut license = Self {
            zero: false,
            non_commercial: false,
            share_alike: false,
            no_derivatives: false,
            version,
        };
        for token in tokens {
            let flag = match token {
                "NC" => &mut license.non_commercial,
                "SA" => &mut license.share_alike,
                "ND" => &mut license.no_derivatives,
                other => {
                    return Err(LicenseError::UnknownAttribute {
                        code: code.to_string(),
                        attribute: other.to_string(),
                    })
                }
            };
            if *flag {
                return Err(LicenseError::ConflictingAttributes {
                    code: code.to_string(),
                    reason: "repeated attribute",
                });
            }
            *flag = true;
        }
        if license.share_alike && license.no_derivatives {
            return Err(LicenseError::ConflictingAttributes {
                code: code.to_string(),
                reason: "ShareAlike requires derivatives",
            });
        }
        Ok(license)
    }

    /// Whether this is CC0.
    pub fn is_zero(&self) -> bool {
        self.zero
    }

    /// Attribution required (every license except CC0).
    pub fn attribution(&self) -> bool {
        !self.zero
    }

    /// Commercial use forbidden.
    pub fn non_commercial(&self) -> bool {
        self.non_commercial
    }

    /// Derivatives must use the same license.
    pub fn share_alike(&self) -> bool {
        self.share_alike
    }

    /// Derivatives forbidden.
    pub fn no_derivatives(&self) -> bool {
        self.no_derivatives
    }

    /// License version, e.g. `4.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    fn attribute_tokens(&self) -> Vec<&'static str> {
        if self.zero {
            return Vec::new();
        }
        let mut tokens = vec!["BY"];
        if self.non_commercial {
            tokens.push("NC");
        }
        if self.share_alike {
            tokens.push("SA");
        }
        if self.no_derivatives {
            tokens.push("ND");
        }
        tokens
    }

    /// Canonical license code.
    pub fn code(&self) -> String {
        if self.zero {
            "CC0".to_string()
        } else {
            format!("CC-{}", self.attribute_tokens().join("-"))
        }
    }

    /// Lowercase attribute path segment, e.g. `by-nc-sa`.
    pub fn attribute_slug(&self) -> String {
        self.attribute_tokens().join("-").to_lowercase()
    }

    /// `(license_class, commercial, derivatives)` for the REST API.
    pub fn cc_attributes(&self) -> (&'static str, &'static str, &'static str) {
        if self.zero {
            return ("zero", "y", "y");
        }
        let commercial = if self.non_commercial { "n" } else { "y" };
        let derivatives = if self.no_derivatives {
            "n"
        } else if self.share_alike {
            "sa"
        } else {
            "y"
        };
        ("standard", commercial, derivatives)
    }

    pub(crate) fn image_path(&self) -> String {
        if self.zero {
            format!("zero/{CC_ZERO_VERSION}")
        } else {
            format!("{}/{}/", self.attribute_slug(), self.version)
        }
    }

    /// Badge image URL (without size suffix).
    pub fn img_url(&self) -> String {
        format!("{CC_IMAGE_BASE}/{}", self.image_path())
    }

    /// Badge image source: `big` selects 88x31, otherwise 80x15.
    pub fn img_src(&self, big: bool) -> String {
        format!(
            "{}/{}.png",
            self.img_url().trim_end_matches('/'),
            badge_size(big)
        )
    }

    /// Human-readable legal deed page.
    pub fn deed_url(&self) -> String {
        if self.zero {
            CC_ZERO_DEED.to_string()
        } else {
            format!("{CC_DEED_BASE}/{}/{}/", self.attribute_slug(), self.version)
        }
    }

    /// Creative Commons REST API query describing this license.
    pub fn api_query_url(&self) -> String {
        let (class, commercial, derivatives) = self.cc_attributes();
        format!("{CC_API_BASE}/{class}/get?commercial={commercial}&derivatives={derivatives}")
    }

    /// Attribute names joined with `-`, e.g. `Attribution-NonCommercial-ShareAlike`.
    pub fn description(&self) -> String {
        if self.zero {
            return "Public Domain Dedication".to_string();
        }
        let mut parts = vec!["Attribution"];
        if self.non_commercial {
            parts.push("NonCommercial");
        }
        if self.share_alike {
            parts.push("ShareAlike");
        }
        if self.no_derivatives {
            parts.push("NoDerivatives");
        }
        parts.join("-")
    }
}

// ─── License ─────────────────────────────────────────────────────────

/// The stored `{"license", "version"}` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// License code; `null` means no license.
    #[serde(default)]
    pub license: Option<String>,
    /// License version, if recorded.
    #[serde(default)]
    pub version: Option<String>,
}

/// License attached to a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "LicenseRecord", try_from = "LicenseRecord")]
pub enum License {
    /// All Rights Reserved.
    AllRightsReserved {
        /// Version, if one was recorded.
        version: Option<String>,
    },
    /// A Creative Commons license.
    CreativeCommons(CcLicense),
}

impl License {
    /// Parse a license code.
    ///
    /// Returns `Ok(None)` for the empty code (no license). A Creative
    /// Commons license without a version gets
    /// [`LicenseConfig::default_cc_version`] (CC0 always defaults to 1.0).
    pub fn parse(
        code: &str,
        version: Option<&str>,
        config: &LicenseConfig,
    ) -> Result<Option<Self>, LicenseError> {
        let version = version.filter(|v| !v.is_empty());
        if code.is_empty() {
            return Ok(None);
        }
        if code == "ARR" {
            return Ok(Some(Self::AllRightsReserved {
                version: version.map(str::to_string),
            }));
        }
        if code == "CC0" || code.starts_with("CC-BY") {
            let version = match version {
                Some(v) => v.to_string(),
                None if code == "CC0" => CC_ZERO_VERSION.to_string(),
                None => {
                    debug!(code, version = %config.default_cc_version, "license version defaulted");
                    config.default_cc_version.clone()
                }
            };
            return CcLicense::parse(code, version).map(|cc| Some(Self::CreativeCommons(cc)));
        }
        Err(LicenseError::Invalid {
            code: code.to_string(),
        })
    }

    /// Parse a stored record.
    pub fn from_record(
        record: &LicenseRecord,
        config: &LicenseConfig,
    ) -> Result<Option<Self>, LicenseError> {
        match record.license.as_deref() {
            Some(code) => Self::parse(code, record.version.as_deref(), config),
            None => Ok(None),
        }
    }

    /// Parse a stored JSON field: `null`, a code string, or a record object.
    pub fn from_json(
        value: &serde_json::Value,
        config: &LicenseConfig,
    ) -> Result<Option<Self>, LicenseError> {
        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(code) => Self::parse(code, None, config),
            serde_json::Value::Object(_) => {
                let record: LicenseRecord = serde_json::from_value(value.clone())
                    .map_err(|e| LicenseError::Record(e.to_string()))?;
                Self::from_record(&record, config)
            }
            other => Err(LicenseError::Invalid {
                code: other.to_string(),
            }),
        }
    }

    /// The stored form of this license.
    pub fn to_record(&self) -> LicenseRecord {
        LicenseRecord {
            license: Some(self.code()),
            version: self.version().map(str::to_string),
        }
    }

    /// License code (`ARR`, `CC0`, `CC-BY-...`).
    pub fn code(&self) -> String {
        match self {
            Self::AllRightsReserved { .. } => "ARR".to_string(),
            Self::CreativeCommons(cc) => cc.code(),
        }
    }

    /// License version, if any.
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::AllRightsReserved { version } => version.as_deref(),
            Self::CreativeCommons(cc) => Some(cc.version()),
        }
    }

    /// The Creative Commons license, if this is one.
    pub fn creative_commons(&self) -> Option<&CcLicense> {
        match self {
            Self::CreativeCommons(cc) => Some(cc),
            Self::AllRightsReserved { .. } => None,
        }
    }

    /// Badge image URL; All Rights Reserved has none.
    pub fn img_url(&self) -> Option<String> {
        self.creative_commons().map(CcLicense::img_url)
    }

    /// Badge image source of the requested size.
    pub fn img_src(&self, big: bool) -> Option<String> {
        self.creative_commons().map(|cc| cc.img_src(big))
    }

    /// Deed page URL; All Rights Reserved has none.
    pub fn deed_url(&self) -> Option<String> {
        self.creative_commons().map(CcLicense::deed_url)
    }

    /// Short description of the license terms.
    pub fn description(&self) -> String {
        match self {
            Self::AllRightsReserved { .. } => "All rights reserved".to_string(),
            Self::CreativeCommons(cc) => cc.description(),
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version() {
            Some(version) => write!(f, "{} {version}", self.code()),
            None => f.write_str(&self.code()),
        }
    }
}

impl From<License> for LicenseRecord {
    fn from(license: License) -> Self {
        license.to_record()
    }
}

impl TryFrom<LicenseRecord> for License {
    type Error = LicenseError;

    fn try_from(record: LicenseRecord) -> Result<Self, Self::Error> {
        Self::from_record(&record, &LicenseConfig::default())?.ok_or(LicenseError::Invalid {
            code: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CC_VERSION;
    use serde_json::json;

    fn parse(code: &str, version: Option<&str>) -> License {
        License::parse(code, version, &LicenseConfig::default())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn arr_has_no_badge() {
        let arr = parse("ARR", None);
        assert_eq!(arr, License::AllRightsReserved { version: None });
        assert!(arr.img_url().is_none());
        assert!(arr.deed_url().is_none());
        assert_eq!(arr.description(), "All rights reserved");
    }

    #[test]
    fn empty_code_is_no_license() {
        assert_eq!(License::parse("", None, &LicenseConfig::default()), Ok(None));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        for code in ["GPL", "CC", "CC-SA", "cc-by", "CC-BYX"] {
            assert!(
                License::parse(code, None, &LicenseConfig::default()).is_err(),
                "{code} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_attribute_is_named() {
        let err = License::parse("CC-BY-XX", None, &LicenseConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LicenseError::UnknownAttribute {
                code: "CC-BY-XX".to_string(),
                attribute: "XX".to_string()
            }
        );
    }

    #[test]
    fn share_alike_and_no_derivatives_conflict() {
        let err = License::parse("CC-BY-SA-ND", None, &LicenseConfig::default()).unwrap_err();
        assert!(matches!(err, LicenseError::ConflictingAttributes { .. }));
        let err = License::parse("CC-BY-NC-NC", None, &LicenseConfig::default()).unwrap_err();
        assert!(matches!(err, LicenseError::ConflictingAttributes { .. }));
    }

    #[test]
    fn cc_attributes_follow_flags() {
        let attrs = |code| parse(code, Some("4.0")).creative_commons().unwrap().cc_attributes();
        assert_eq!(attrs("CC0"), ("zero", "y", "y"));
        assert_eq!(attrs("CC-BY"), ("standard", "y", "y"));
        assert_eq!(attrs("CC-BY-NC-SA"), ("standard", "n", "sa"));
        assert_eq!(attrs("CC-BY-ND"), ("standard", "y", "n"));
    }

    #[test]
    fn image_urls() {
        let cc0 = parse("CC0", None);
        assert_eq!(
            cc0.img_url().as_deref(),
            Some("http://i.creativecommons.org/l/zero/1.0")
        );
        assert_eq!(
            cc0.img_src(false).as_deref(),
            Some("http://i.creativecommons.org/l/zero/1.0/80x15.png")
        );
        let by_sa = parse("CC-BY-SA", Some("3.0"));
        assert_eq!(
            by_sa.img_url().as_deref(),
            Some("http://i.creativecommons.org/l/by-sa/3.0/")
        );
        assert_eq!(
            by_sa.img_src(true).as_deref(),
            Some("http://i.creativecommons.org/l/by-sa/3.0/88x31.png")
        );
    }

    #[test]
    fn deed_and_api_urls() {
        let cc = parse("CC-BY-NC-ND", Some("4.0"));
        assert_eq!(
            cc.deed_url().as_deref(),
            Some("http://creativecommons.org/licenses/by-nc-nd/4.0/")
        );
        assert_eq!(
            cc.creative_commons().unwrap().api_query_url(),
            "http://api.creativecommons.org/rest/1.5/license/standard/get?commercial=n&derivatives=n"
        );
        assert_eq!(
            parse("CC0", None).deed_url().as_deref(),
            Some("http://creativecommons.org/publicdomain/zero/1.0/")
        );
    }

    #[test]
    fn missing_version_uses_configured_default() {
        let config = LicenseConfig {
            default_cc_version: "3.0".to_string(),
            ..LicenseConfig::default()
        };
        let cc = License::parse("CC-BY", None, &config).unwrap().unwrap();
        assert_eq!(cc.version(), Some("3.0"));
        let cc = License::parse("CC-BY", Some(""), &config).unwrap().unwrap();
        assert_eq!(cc.version(), Some("3.0"));
        assert_eq!(parse("CC0", None).version(), Some("1.0"));
    }

    #[test]
    fn attribute_order_is_canonicalized() {
        assert_eq!(parse("CC-BY-SA-NC", Some("4.0")).code(), "CC-BY-NC-SA");
    }

    #[test]
    fn description_lists_attributes() {
        assert_eq!(
            parse("CC-BY-NC-SA", Some("4.0")).description(),
            "Attribution-NonCommercial-ShareAlike"
        );
        assert_eq!(parse("CC0", None).description(), "Public Domain Dedication");
    }

    #[test]
    fn from_json_accepts_null_string_and_record() {
        let config = LicenseConfig::default();
        assert_eq!(License::from_json(&json!(null), &config), Ok(None));
        assert_eq!(License::from_json(&json!(""), &config), Ok(None));
        assert_eq!(
            License::from_json(&json!("ARR"), &config).unwrap(),
            Some(License::AllRightsReserved { version: None })
        );
        let cc = License::from_json(&json!({"license": "CC-BY-NC", "version": "2.5"}), &config)
            .unwrap()
            .unwrap();
        assert_eq!(cc.version(), Some("2.5"));
        assert!(License::from_json(&json!(42), &config).is_err());
        assert!(matches!(
            License::from_json(&json!({"license": ["ARR"]}), &config),
            Err(LicenseError::Record(_))
        ));
    }

    #[test]
    fn record_without_code_is_no_license() {
        let config = LicenseConfig::default();
        assert_eq!(
            License::from_json(&json!({"license": null, "version": "4.0"}), &config),
            Ok(None)
        );
        assert_eq!(License::from_json(&json!({"version": "1.0"}), &config), Ok(None));
        let record = LicenseRecord {
            license: None,
            version: Some("4.0".to_string()),
        };
        assert_eq!(License::from_record(&record, &config), Ok(None));
    }

    #[test]
    fn serializes_as_record() {
        let cc = parse("CC-BY-SA", Some("4.0"));
        assert_eq!(
            serde_json::to_value(&cc).unwrap(),
            json!({"license": "CC-BY-SA", "version": "4.0"})
        );
        let arr = parse("ARR", None);
        assert_eq!(
            serde_json::to_value(&arr).unwrap(),
            json!({"license": "ARR", "version": null})
        );
        let back: License = serde_json::from_value(json!({"license": "CC-BY"})).unwrap();
        assert_eq!(back.version(), Some(DEFAULT_CC_VERSION));
        assert!(serde_json::from_value::<License>(json!({"license": ""})).is_err());
    }

    #[test]
    fn display_includes_version() {
        assert_eq!(parse("CC-BY", Some("4.0")).to_string(), "CC-BY 4.0");
        assert_eq!(parse("ARR", None).to_string(), "ARR");
    }
}
