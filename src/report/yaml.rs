//! YAML formatter.

use crate::error::ReportError;
use crate::policy::types::ScanResult;
use crate::report::Formatter;

/// YAML with the same fields as the JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn format(&self, result: &ScanResult) -> Result<Vec<u8>, ReportError> {
        Ok(serde_yaml::to_string(result)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::types::Severity;
    use crate::policy::types::tests::issue;

    #[test]
    fn test_yaml_is_structurally_equivalent() {
        let mut result = ScanResult::new();
        result.record(issue("HK-002", Severity::Medium));

        let out = YamlFormatter.format(&result).unwrap();
        let parsed: ScanResult = serde_yaml::from_slice(&out).unwrap();
        assert_eq!(parsed, result);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("total_issues: 1"));
        assert!(text.contains("severity: MEDIUM"));
    }
}
