use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    calendar::{CalendarGrid, CellPolicy, calendar_view, year_month_or_current},
    endpoints,
    html::{CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base},
    month::YearMonth,
    navigation::NavBar,
    reports::{
        aggregation::{expense_totals_by_category, income_vs_expense},
        charts::{ReportChart, charts_script, expenses_by_category_chart, income_vs_expense_chart},
        filter::TimeFilter,
    },
    timezone::get_local_today,
    transaction::{Transaction, TransactionFilter, get_transactions},
};

const EXPENSES_CHART_ID: &str = "expenses-by-category-chart";
const INCOME_VS_EXPENSE_CHART_ID: &str = "income-vs-expense-chart";

/// The state needed for the reports page.
#[derive(Debug, Clone)]
pub struct ReportsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    #[serde(default)]
    pub period: TimeFilter,
    /// The month shown in the expense calendar as "YYYY-MM".
    ///
    /// The calendar starts open when this is set.
    pub calendar: Option<String>,
}

fn reports_page_url(period: TimeFilter, calendar: Option<YearMonth>) -> String {
    match calendar {
        Some(year_month) => format!(
            "{}?period={}&calendar={year_month}",
            endpoints::REPORTS_VIEW,
            period.query_value()
        ),
        None => format!("{}?period={}", endpoints::REPORTS_VIEW, period.query_value()),
    }
}

fn get_user_transactions(
    user_id: UserID,
    date_range: std::ops::RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    get_transactions(
        user_id,
        &TransactionFilter {
            date_range: Some(date_range),
            ..Default::default()
        },
        connection,
    )
    .inspect_err(|error| tracing::error!("could not get transactions for reports: {error}"))
}

/// Display charts of the user's expenses and income for a period, and a calendar of expenses.
pub async fn get_reports_page(
    State(state): State<ReportsPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportsQuery>,
) -> Result<Response, Error> {
    let today = get_local_today(&state.local_timezone)?;
    let calendar_month = year_month_or_current(query.calendar.as_deref(), today);
    let grid = CalendarGrid::new(calendar_month, today, CellPolicy::Fixed42);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let period_transactions =
        get_user_transactions(user_id, query.period.date_range(today), &connection)?;
    let calendar_expenses = get_user_transactions(user_id, grid.date_range(), &connection)?
        .into_iter()
        .rev()
        .filter(Transaction::is_expense);
    let grid = grid.with_transactions(calendar_expenses);

    let expense_totals = expense_totals_by_category(&period_transactions);
    let totals = income_vs_expense(&period_transactions);

    let mut charts = Vec::new();
    if !expense_totals.is_empty() {
        charts.push(ReportChart {
            id: EXPENSES_CHART_ID,
            options: expenses_by_category_chart(&expense_totals).to_string(),
        });
    }
    if !totals.is_empty() {
        charts.push(ReportChart {
            id: INCOME_VS_EXPENSE_CHART_ID,
            options: income_vs_expense_chart(totals, query.period).to_string(),
        });
    }

    let view = ReportsView {
        period: query.period,
        has_expense_totals: !expense_totals.is_empty(),
        has_totals: !totals.is_empty(),
        grid: &grid,
        calendar_open: query.calendar.is_some(),
    };

    Ok(reports_view(view, &charts).into_response())
}

struct ReportsView<'a> {
    period: TimeFilter,
    has_expense_totals: bool,
    has_totals: bool,
    grid: &'a CalendarGrid,
    calendar_open: bool,
}

fn reports_view(view: ReportsView, charts: &[ReportChart]) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();
    let calendar_month = view.grid.year_month;
    let previous_url = reports_page_url(view.period, Some(calendar_month.previous()));
    let next_url = reports_page_url(view.period, Some(calendar_month.next()));

    let content = html! {
        (nav_bar)

        main class={"space-y-8 " (PAGE_CONTAINER_STYLE)}
        {
            section class=(CARD_STYLE)
            {
                h1 class="text-3xl font-bold mb-4" { "Relatórios" }

                (time_filter_buttons(view.period))

                div class="grid grid-cols-1 lg:grid-cols-2 gap-8"
                {
                    (chart_container(
                        EXPENSES_CHART_ID,
                        view.has_expense_totals,
                        "Sem dados de despesa para este período.",
                    ))
                    (chart_container(
                        INCOME_VS_EXPENSE_CHART_ID,
                        view.has_totals,
                        "Sem dados para este período.",
                    ))
                }
            }

            details id="expense-calendar" class=(CARD_STYLE) open[view.calendar_open]
            {
                summary class="text-xl font-bold cursor-pointer"
                {
                    span role="img" aria-label="Calendário" class="mr-3 text-2xl" { "📅" }
                    "Calendário de Gastos"
                }

                div class="pt-6 mt-4 border-t border-gray-200 dark:border-gray-700"
                {
                    (calendar_view(view.grid, &previous_url, &next_url))
                }
            }
        }
    };

    let mut head_elements = Vec::new();
    if !charts.is_empty() {
        head_elements.push(HeadElement::ScriptLink(
            "/static/echarts.6.0.0.min.js".to_owned(),
        ));
        head_elements.push(charts_script(charts));
    }

    base("Relatórios", &head_elements, &content)
}

fn time_filter_buttons(selected: TimeFilter) -> Markup {
    html! {
        nav id="time-filter" class="flex gap-2 mb-8"
        {
            @for filter in TimeFilter::ALL {
                @let style = if filter == selected {
                    "bg-blue-600 text-white"
                } else {
                    "bg-gray-200 text-gray-700 dark:bg-gray-700 dark:text-gray-200"
                };

                a
                    href=(reports_page_url(filter, None))
                    class={"px-4 py-2 rounded-lg font-semibold " (style)}
                    aria-current=[(filter == selected).then_some("page")]
                {
                    (filter.label())
                }
            }
        }
    }
}

fn chart_container(id: &str, has_data: bool, empty_message: &str) -> Markup {
    html! {
        @if has_data {
            div id=(id) class="min-h-[380px] rounded dark:bg-gray-100" {}
        } @else {
            p class="text-center text-gray-500 pt-16" { (empty_message) }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::{Duration, macros::date};

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        category::Category,
        db::initialize,
        reports::filter::TimeFilter,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        timezone::get_local_today,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{ReportsPageState, ReportsQuery, get_reports_page};

    fn get_state() -> (ReportsPageState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(
            "test@test.com",
            "",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (
            ReportsPageState {
                db_connection: Arc::new(Mutex::new(connection)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            user.id,
        )
    }

    async fn render(state: ReportsPageState, user_id: UserID, query: ReportsQuery) -> Html {
        let response = get_reports_page(State(state), Extension(user_id), Query(query))
            .await
            .unwrap();
        assert_status_ok(&response);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        html
    }

    fn page_text(html: &Html) -> String {
        html.root_element().text().collect()
    }

    #[tokio::test]
    async fn shows_empty_messages_without_transactions() {
        let (state, user_id) = get_state();

        let html = render(state, user_id, ReportsQuery::default()).await;

        let text = page_text(&html);
        assert!(text.contains("Sem dados de despesa para este período."));
        assert!(text.contains("Sem dados para este período."));
        assert!(
            html.select(&Selector::parse("#expenses-by-category-chart").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn shows_charts_for_transactions_this_month() {
        let (state, user_id) = get_state();
        let today = get_local_today("Etc/UTC").unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                user_id,
                Transaction::build(TransactionType::Expense, 45.0, today, "Almoço")
                    .category(Category::Alimentacao),
                &connection,
            )
            .unwrap();
        }

        let html = render(state, user_id, ReportsQuery::default()).await;

        assert!(
            html.select(&Selector::parse("#expenses-by-category-chart").unwrap())
                .next()
                .is_some()
        );
        assert!(
            html.select(&Selector::parse("#income-vs-expense-chart").unwrap())
                .next()
                .is_some()
        );
        let script: String = html
            .select(&Selector::parse("script").unwrap())
            .flat_map(|script| script.text())
            .collect();
        assert!(script.contains("Alimentação"));
    }

    #[tokio::test]
    async fn only_income_shows_bar_chart_but_no_pie_chart() {
        let (state, user_id) = get_state();
        let today = get_local_today("Etc/UTC").unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                user_id,
                Transaction::build(TransactionType::Income, 3000.0, today, "Salário")
                    .category(Category::Salario),
                &connection,
            )
            .unwrap();
        }

        let html = render(state, user_id, ReportsQuery::default()).await;

        let text = page_text(&html);
        assert!(text.contains("Sem dados de despesa para este período."));
        assert!(!text.contains("Sem dados para este período."));
    }

    #[tokio::test]
    async fn week_filter_leaves_out_older_transactions() {
        let (state, user_id) = get_state();
        let today = get_local_today("Etc/UTC").unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                user_id,
                Transaction::build(
                    TransactionType::Expense,
                    45.0,
                    today - Duration::days(8),
                    "Cinema",
                ),
                &connection,
            )
            .unwrap();
        }

        let html = render(
            state,
            user_id,
            ReportsQuery {
                period: TimeFilter::Week,
                calendar: None,
            },
        )
        .await;

        assert!(page_text(&html).contains("Sem dados para este período."));
        let selected: Vec<String> = html
            .select(&Selector::parse("#time-filter a[aria-current=page]").unwrap())
            .map(|link| link.text().collect())
            .collect();
        assert_eq!(selected, ["Semana"]);
    }

    #[tokio::test]
    async fn calendar_is_closed_by_default() {
        let (state, user_id) = get_state();

        let html = render(state, user_id, ReportsQuery::default()).await;

        let details = html
            .select(&Selector::parse("details#expense-calendar").unwrap())
            .next()
            .unwrap();
        assert_eq!(details.value().attr("open"), None);
    }

    #[tokio::test]
    async fn calendar_shows_only_expenses_of_requested_month() {
        let (state, user_id) = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                user_id,
                Transaction::build(TransactionType::Expense, 25.0, date!(2025 - 03 - 10), "Farmácia"),
                &connection,
            )
            .unwrap();
            create_transaction(
                user_id,
                Transaction::build(TransactionType::Income, 500.0, date!(2025 - 03 - 10), "Freelance"),
                &connection,
            )
            .unwrap();
        }

        let html = render(
            state,
            user_id,
            ReportsQuery {
                period: TimeFilter::Month,
                calendar: Some("2025-03".to_owned()),
            },
        )
        .await;

        let details = html
            .select(&Selector::parse("details#expense-calendar").unwrap())
            .next()
            .unwrap();
        assert!(details.value().attr("open").is_some());

        let cells: Vec<_> = details
            .select(&Selector::parse("[data-date]").unwrap())
            .collect();
        assert_eq!(cells.len(), 42);

        let cell: String = details
            .select(&Selector::parse("[data-date=\"2025-03-10\"]").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert!(cell.contains("Farmácia"));
        assert!(!cell.contains("Freelance"));

        let hrefs: Vec<_> = details
            .select(&Selector::parse(".calendar a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(
            hrefs,
            [
                "/reports?period=month&calendar=2025-02",
                "/reports?period=month&calendar=2025-04"
            ]
        );
    }

    #[tokio::test]
    async fn out_of_range_calendar_month_shows_current_month() {
        let (state, user_id) = get_state();
        let today = get_local_today("Etc/UTC").unwrap();

        let html = render(
            state,
            user_id,
            ReportsQuery {
                period: TimeFilter::Month,
                calendar: Some("9999-12".to_owned()),
            },
        )
        .await;

        let selector = Selector::parse(&format!(
            "details#expense-calendar [data-date=\"{today}\"]"
        ))
        .unwrap();
        assert!(html.select(&selector).next().is_some());
    }
}
