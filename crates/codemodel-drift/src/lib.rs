pub mod engine;
pub mod identity;
pub mod report;
pub mod rules;

pub use engine::DriftEngine;
pub use report::{Clock, ReportSummary, ValidationReport, ValidationReportGenerator};
pub use rules::*;
