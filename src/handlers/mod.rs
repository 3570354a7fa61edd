pub mod fix;
pub mod report;
pub mod scan;

pub use fix::handle_fix;
pub use report::{generate_report, handle_report};
pub use scan::{ScanOptions, handle_scan};
