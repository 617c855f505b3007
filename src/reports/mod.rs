//! Reports of income and expenses over a period of time.
//!
//! The page shows a pie chart of expenses per category, a bar chart of
//! income against expenses and a collapsible calendar of expenses.

mod aggregation;
mod charts;
mod filter;
mod page;

pub use page::get_reports_page;
