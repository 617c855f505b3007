use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    calendar::grid::{CalendarGrid, CellPolicy, calendar_view},
    endpoints,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base},
    month::YearMonth,
    navigation::NavBar,
    timezone::get_local_today,
    transaction::{TransactionFilter, get_transactions},
};

/// The state needed for the calendar page.
#[derive(Debug, Clone)]
pub struct CalendarPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for CalendarPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    /// The month to show as "YYYY-MM".
    pub month: Option<String>,
}

/// Parse `month`, falling back to the month of `today` when it is missing or invalid.
pub(crate) fn year_month_or_current(month: Option<&str>, today: time::Date) -> YearMonth {
    match month.map(str::parse::<YearMonth>) {
        Some(Ok(year_month)) => year_month,
        Some(Err(error)) => {
            tracing::warn!("falling back to the current month: {error}");
            YearMonth::of(today)
        }
        None => YearMonth::of(today),
    }
}

fn calendar_page_url(year_month: YearMonth) -> String {
    format!("{}?month={year_month}", endpoints::CALENDAR_VIEW)
}

/// Display a month calendar of all of the user's transactions.
pub async fn get_calendar_page(
    State(state): State<CalendarPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, Error> {
    let today = get_local_today(&state.local_timezone)?;
    let year_month = year_month_or_current(query.month.as_deref(), today);
    let grid = CalendarGrid::new(year_month, today, CellPolicy::Compact);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(
        user_id,
        &TransactionFilter {
            date_range: Some(grid.date_range()),
            ..Default::default()
        },
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not get transactions for {year_month}: {error}"))?;

    // Oldest first so each day lists its transactions in the order they were added.
    let grid = grid.with_transactions(transactions.into_iter().rev());

    Ok(calendar_page_view(&grid).into_response())
}

fn calendar_page_view(grid: &CalendarGrid) -> Markup {
    let nav_bar = NavBar::new(endpoints::CALENDAR_VIEW).into_html();
    let previous_url = calendar_page_url(grid.year_month.previous());
    let next_url = calendar_page_url(grid.year_month.next());

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class=(CARD_STYLE)
            {
                h1 class="text-3xl font-bold mb-6" { "Calendário de Movimentações" }

                (calendar_view(grid, &previous_url, &next_url))
            }
        }
    };

    base("Calendário", &[], &content)
}
