pub mod attendance;
pub mod cli;
pub mod config;
pub mod error;
pub mod global;
pub mod report;
pub mod scoring;
pub mod zoom;

pub use error::{ReportError, ReportResult};
pub use report::{generate_report, MeetingReport, ReportOptions};
