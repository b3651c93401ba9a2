//! Output formatting for CLI results.

pub mod deployment;
pub mod fee;
pub mod report;

pub use deployment::format_deployment_detail;
pub use fee::format_fee_table;
pub use report::format_run_report;
