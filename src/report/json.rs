//! JSON formatter.

use crate::error::ReportError;
use crate::policy::types::ScanResult;
use crate::report::Formatter;

/// Indented JSON of the full result document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, result: &ScanResult) -> Result<Vec<u8>, ReportError> {
        serde_json::to_vec_pretty(result).map_err(ReportError::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_is_indented_document() {
        let out = JsonFormatter.format(&ScanResult::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("{\n  \"issues\": []"));
        assert!(text.contains("\"total_issues\": 0"));
        assert!(text.contains("\"CRITICAL\": 0"));
    }
}
