//! Handler for the `report` command.
//!
//! Re-renders saved JSON scan results in another format. A malformed input
//! document aborts before anything is written.

use crate::error::Result;
use crate::logging::{LogForwarder, ScanLog};
use crate::report::{ReportFormat, read_result, save};
use std::path::{Path, PathBuf};

/// Handle the `report` command.
pub fn handle_report(input: &Path, output_dir: &Path, format: &str) -> Result<PathBuf> {
    let path = generate_report(input, output_dir, format, &LogForwarder)?;
    println!("Report saved to {}", path.display());
    Ok(path)
}

/// Read `input`, render it and save `<output_dir>/report.<format>`.
///
/// Unknown format names fall back to JSON (with a warning on `log`), and
/// the file extension follows the resolved format.
pub fn generate_report(
    input: &Path,
    output_dir: &Path,
    format: &str,
    log: &dyn ScanLog,
) -> Result<PathBuf> {
    log.info(&format!(
        "Generating report from {} (format: {})",
        input.display(),
        format
    ));

    let result = read_result(input)?;
    let format = ReportFormat::resolve(format, log);
    let data = format.formatter().format(&result)?;

    let path = format.output_path(output_dir, "report");
    save(&data, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HardenaError, ReportError};
    use crate::logging::MemoryLog;
    use crate::policy::types::tests::issue;
    use crate::policy::types::{ScanResult, Severity};
    use crate::report::{Formatter, JsonFormatter};
    use std::fs;
    use tempfile::TempDir;

    fn write_results(dir: &Path) -> PathBuf {
        let mut result = ScanResult::new();
        result.record(issue("HK-001", Severity::Critical));
        let path = dir.join("scan-results.json");
        fs::write(&path, JsonFormatter.format(&result).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_generates_html_report() {
        let dir = TempDir::new().unwrap();
        let input = write_results(dir.path());
        let out_dir = dir.path().join("reports");

        let path = generate_report(&input, &out_dir, "html", &MemoryLog::new()).unwrap();
        assert_eq!(path, out_dir.join("report.html"));
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("Title HK-001"));
    }

    #[test]
    fn test_unknown_format_writes_json() {
        let dir = TempDir::new().unwrap();
        let input = write_results(dir.path());
        let log = MemoryLog::new();

        let path = generate_report(&input, dir.path(), "xml", &log).unwrap();
        assert_eq!(path, dir.path().join("report.json"));
        assert_eq!(log.warnings().len(), 1);

        let reparsed = read_result(&path).unwrap();
        assert_eq!(reparsed.stats.total_issues, 1);
    }

    #[test]
    fn test_malformed_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.json");
        fs::write(&input, "{\"issues\": [").unwrap();
        let out_dir = dir.path().join("reports");

        let err = generate_report(&input, &out_dir, "yaml", &MemoryLog::new()).unwrap_err();
        assert!(matches!(err, HardenaError::Report(ReportError::Parse(_))));
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = generate_report(
            &dir.path().join("absent.json"),
            dir.path(),
            "json",
            &MemoryLog::new(),
        )
        .unwrap_err();
        assert!(matches!(err, HardenaError::Report(ReportError::Read { .. })));
    }
}
