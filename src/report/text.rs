//! Plain text formatter.
//!
//! A one-line summary only; the coloured terminal listing lives in the
//! scan handler.

use crate::error::ReportError;
use crate::policy::types::ScanResult;
use crate::report::Formatter;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format(&self, result: &ScanResult) -> Result<Vec<u8>, ReportError> {
        Ok(format!("Summary: {} issues found", result.stats.total_issues).into_bytes())
    }
}
