//! Fee reports across students.
//!
//! Provides:
//! - Due summary: who owes, who has overpaid, and the totals
//! - Collection: amounts collected per month and quarter of a year

pub mod service;
pub mod types;

pub use service::ReportService;
pub use types::{
    CollectionReport, DueSummaryReport, DueSummaryRow, MonthlyCollection, QuarterlyCollection,
};
