//! Printable patient reports.

mod pdf;

pub use pdf::{patient_report, ReportError};
