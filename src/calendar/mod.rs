//! Month calendars of transactions.

mod grid;
mod page;

pub use grid::{CalendarGrid, CellPolicy, calendar_view};
pub use page::get_calendar_page;
pub(crate) use page::year_month_or_current;
