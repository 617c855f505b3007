//! Dashboard module
//!
//! The landing page after logging in: totals of income and expenses, the
//! user's level, their plan and the most recent transactions.

mod cards;
mod handlers;
mod level;
mod summary;

pub use handlers::get_dashboard_page;
