//! Month calendar grids with transactions binned by day.

use std::ops::RangeInclusive;

use maud::{Markup, html};
use time::{Date, Duration};

use crate::{
    html::{EXPENSE_TEXT_STYLE, INCOME_TEXT_STYLE, format_currency, format_date},
    month::YearMonth,
    transaction::Transaction,
};

/// Short weekday names, starting on Sunday.
pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

const DAYS_IN_WEEK: usize = 7;
const COMPACT_CELLS: usize = 5 * DAYS_IN_WEEK;
const FULL_CELLS: usize = 6 * DAYS_IN_WEEK;

/// How many cells a calendar grid has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPolicy {
    /// Always six weeks.
    Fixed42,
    /// Five weeks, or six if the month does not fit in five.
    Compact,
}

/// A day in a calendar grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub date: Date,
    /// False for the filler days of the previous and next month.
    pub in_month: bool,
    pub is_today: bool,
    pub transactions: Vec<Transaction>,
}

/// The days of a month laid out in weeks starting on Sunday.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    pub year_month: YearMonth,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    /// Lay out `year_month`, starting from the Sunday on or before the first of the month.
    pub fn new(year_month: YearMonth, today: Date, cell_policy: CellPolicy) -> Self {
        let first_day = year_month.first_day();
        let leading_days = first_day.weekday().number_days_from_sunday() as usize;
        let used_cells = leading_days + year_month.number_of_days() as usize;

        let cell_count = match cell_policy {
            CellPolicy::Fixed42 => FULL_CELLS,
            CellPolicy::Compact if used_cells > COMPACT_CELLS => FULL_CELLS,
            CellPolicy::Compact => COMPACT_CELLS,
        };

        let grid_start = first_day.saturating_sub(Duration::days(leading_days as i64));
        let cells = (0..cell_count)
            .map(|offset| {
                let date = grid_start.saturating_add(Duration::days(offset as i64));

                CalendarCell {
                    date,
                    in_month: year_month.contains(date),
                    is_today: date == today,
                    transactions: Vec::new(),
                }
            })
            .collect();

        Self { year_month, cells }
    }

    /// The dates covered by the grid, filler days included.
    pub fn date_range(&self) -> RangeInclusive<Date> {
        let first = self
            .cells
            .first()
            .map(|cell| cell.date)
            .unwrap_or_else(|| self.year_month.first_day());
        let last = self
            .cells
            .last()
            .map(|cell| cell.date)
            .unwrap_or_else(|| self.year_month.last_day());

        first..=last
    }

    /// Put each transaction in the cell of its date. Transactions outside the grid are dropped.
    pub fn with_transactions(mut self, transactions: impl IntoIterator<Item = Transaction>) -> Self {
        let Some(grid_start) = self.cells.first().map(|cell| cell.date) else {
            return self;
        };

        for transaction in transactions {
            let offset = (transaction.date - grid_start).whole_days();

            if offset < 0 {
                continue;
            }

            if let Some(cell) = self.cells.get_mut(offset as usize) {
                cell.transactions.push(transaction);
            }
        }

        self
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(DAYS_IN_WEEK)
    }
}

/// Render the grid with a header that links to the previous and next months.
pub fn calendar_view(grid: &CalendarGrid, previous_url: &str, next_url: &str) -> Markup {
    html! {
        div class="calendar"
        {
            div class="flex justify-between items-center mb-4"
            {
                a
                    href=(previous_url)
                    aria-label="Mês anterior"
                    class="p-2 rounded-full hover:bg-gray-100 dark:hover:bg-gray-700 text-lg font-bold"
                {
                    "←"
                }
                h3 class="text-xl font-semibold" { (grid.year_month.label()) }
                a
                    href=(next_url)
                    aria-label="Próximo mês"
                    class="p-2 rounded-full hover:bg-gray-100 dark:hover:bg-gray-700 text-lg font-bold"
                {
                    "→"
                }
            }

            div class="grid grid-cols-7 border-r border-b border-gray-200 dark:border-gray-700"
            {
                @for label in WEEKDAY_LABELS {
                    div class="text-center font-semibold text-gray-600 dark:text-gray-300 py-2 \
                        border-t border-l border-gray-200 dark:border-gray-700 bg-gray-50 dark:bg-gray-800"
                    {
                        (label)
                    }
                }

                @for cell in &grid.cells {
                    (day_cell(cell))
                }
            }
        }
    }
}

fn day_cell(cell: &CalendarCell) -> Markup {
    let background = match (cell.in_month, cell.transactions.is_empty()) {
        (false, _) => "bg-gray-50 dark:bg-gray-900",
        (true, true) => "bg-white dark:bg-gray-800",
        (true, false) => "bg-red-50 dark:bg-gray-700",
    };
    let day_style = if cell.is_today {
        "bg-blue-600 text-white rounded-full h-6 w-6 flex items-center justify-center"
    } else if cell.in_month {
        "text-gray-900 dark:text-white"
    } else {
        "text-gray-400"
    };

    html! {
        div
            class={"relative min-h-24 border-t border-l border-gray-200 dark:border-gray-700 p-2 flex flex-col " (background)}
            data-date=(cell.date.to_string())
            data-today[cell.is_today]
            data-filler[!cell.in_month]
        {
            span class={"self-start text-sm " (day_style)} { (cell.date.day()) }

            @if !cell.transactions.is_empty() {
                ul class="mt-1 space-y-1 text-xs" title=(format!("Movimentações de {}", format_date(cell.date)))
                {
                    @for transaction in &cell.transactions {
                        @let amount_style = if transaction.is_expense() { EXPENSE_TEXT_STYLE } else { INCOME_TEXT_STYLE };

                        li class="flex justify-between gap-1"
                        {
                            span class="truncate" { (transaction.description) }
                            span class={"font-semibold whitespace-nowrap " (amount_style)}
                            {
                                (format_currency(transaction.amount))
                            }
                        }
                    }
                }
            }
        }
    }
}
