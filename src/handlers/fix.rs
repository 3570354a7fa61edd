//! Handler for the `fix` command.
//!
//! Lists the remediation for every finding in saved scan results. Nothing
//! is applied to the cluster; changes have to be made to the manifests by
//! hand.

use crate::error::Result;
use crate::policy::types::ScanResult;
use crate::report::read_result;
use crate::ui;
use colored::Colorize;
use std::fmt::Write as _;
use std::path::Path;

/// Handle the `fix` command.
pub fn handle_fix(input: &Path, dry_run: bool) -> Result<()> {
    let result = read_result(input)?;
    print!("{}", render_fix_plan(&result, dry_run));
    Ok(())
}

/// The remediation plan for a result.
pub fn render_fix_plan(result: &ScanResult, dry_run: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ui::header("Starting Security Hardening..."));

    if dry_run {
        let _ = writeln!(
            out,
            "{}",
            ui::info("Running in Dry Run mode. No changes will be applied.")
        );
    }

    if result.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            ui::success("No issues to fix. Cluster is already hardened.")
        );
        return out;
    }

    let _ = writeln!(
        out,
        "{}",
        ui::info(&format!("Analyzing {} issues...", result.issues.len()))
    );

    for issue in &result.issues {
        let _ = writeln!(
            out,
            "\nIssue: {} ({})",
            ui::header(&issue.title),
            issue.id
        );
        let _ = writeln!(out, "Target: {}", issue.resource_identifier());
        let _ = writeln!(out, "Action: {}", issue.remediation.green().bold());
    }

    let _ = writeln!(
        out,
        "\n{}",
        ui::warning("Automated remediation is not available.")
    );
    let _ = writeln!(
        out,
        "{}",
        ui::info("Please apply the above changes manually to your manifests.")
    );

    if dry_run {
        let _ = writeln!(out, "\n{}", ui::success("Dry run completed."));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::types::Severity;
    use crate::policy::types::tests::issue;

    #[test]
    fn test_plan_lists_every_issue() {
        colored::control::set_override(false);
        let mut result = ScanResult::new();
        result.record(issue("HK-001", Severity::Critical));
        result.record(issue("HK-002", Severity::Medium));

        let out = render_fix_plan(&result, true);
        assert!(out.contains("Analyzing 2 issues..."));
        assert!(out.contains("Issue: Title HK-001 (HK-001)"));
        assert!(out.contains("Issue: Title HK-002 (HK-002)"));
        assert!(out.contains("Action: fix it"));
        assert!(out.contains("Dry run completed."));
    }

    #[test]
    fn test_plan_for_clean_cluster() {
        colored::control::set_override(false);
        let out = render_fix_plan(&ScanResult::new(), false);
        assert!(out.contains("Cluster is already hardened."));
        assert!(!out.contains("Dry Run mode"));
        assert!(!out.contains("Analyzing"));
    }
}
