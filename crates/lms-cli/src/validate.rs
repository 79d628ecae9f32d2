//! # Validate Subcommand
//!
//! Checks every block of a course document for group access that refers
//! to deleted partitions or groups, plus unknown settings values. Exits
//! with status 1 when any error-level issue is found.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use lms_access::{validate_course, BlockValidation, CourseTree};

use crate::{load_course, OutputFormat};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Course document (YAML, or JSON with a `.json` extension).
    pub file: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Outcome of validating a course.
#[derive(Debug)]
pub struct ValidationReport {
    /// Blocks with at least one issue, in pre-order.
    pub findings: Vec<BlockValidation>,
    /// Number of blocks checked.
    pub blocks_checked: usize,
}

impl ValidationReport {
    /// Validate every block of `tree`.
    pub fn build(tree: &CourseTree) -> Self {
        let all = validate_course(tree);
        let blocks_checked = all.len();
        let findings = all.into_iter().filter(|v| !v.issues.is_empty()).collect();
        Self {
            findings,
            blocks_checked,
        }
    }

    /// Total error-level issues.
    pub fn error_count(&self) -> usize {
        self.findings.iter().map(|v| v.errors().count()).sum()
    }

    /// Total warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.findings.iter().map(|v| v.warnings().count()).sum()
    }

    /// Process exit code: 1 if any error was found.
    pub fn exit_code(&self) -> u8 {
        u8::from(self.error_count() > 0)
    }

    /// Render the report.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&self.findings)?),
            OutputFormat::Text => {
                let mut lines: Vec<String> = self
                    .findings
                    .iter()
                    .flat_map(|v| v.issues.iter().map(move |issue| format!("{}: {issue}", v.block)))
                    .collect();
                lines.push(format!(
                    "{} blocks checked, {} errors, {} warnings",
                    self.blocks_checked,
                    self.error_count(),
                    self.warning_count()
                ));
                Ok(lines.join("\n"))
            }
        }
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let tree = load_course(&args.file)?;
    let report = ValidationReport::build(&tree);
    println!("{}", report.render(args.format)?);
    Ok(report.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_course;

    #[test]
    fn reports_dangling_references_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tree = load_course(&write_course(&dir)).unwrap();
        let report = ValidationReport::build(&tree);
        assert_eq!(report.blocks_checked, 4);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.exit_code(), 1);

        let text = report.render(OutputFormat::Text).unwrap();
        assert!(text.contains("week2: error: refers to missing group 7 in partition 50"));
        assert!(text.ends_with("4 blocks checked, 2 errors, 1 warnings"));
    }

    #[test]
    fn json_report_lists_issue_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let tree = load_course(&write_course(&dir)).unwrap();
        let json = ValidationReport::build(&tree).render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["block"], "week2");
        assert_eq!(value[0]["issues"][0]["kind"], "missing_group");
        assert_eq!(value[0]["issues"][1]["kind"], "missing_partition");
        assert_eq!(value[0]["issues"][2]["severity"], "warning");
    }
}
