//! ATS Checker: scores a resume against a job description through a remote
//! analysis service and turns its free-text report into structured results.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod types;
pub mod utils;
pub mod web;

pub use analysis::{parse_report, AnalysisResult, ReportParser};
pub use web::start_web_server;
