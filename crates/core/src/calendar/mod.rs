//! Calendar months and monthly billing periods.

pub mod month;
pub mod period;

pub use month::{Month, ParseMonthError};
pub use period::BillingPeriod;
