//! Fixed expenses page for a month, with the month's total and a form for adding expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Month;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    fixed_expense::{
        FixedExpense, create::fixed_expense_form_fields, get_fixed_expenses_for_month,
        month_total,
    },
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        currency_input_styles, edit_delete_action_links, format_currency, truncate_description,
    },
    month::{all_months, month_name, parse_month_name},
    navigation::NavBar,
    timezone::get_local_today,
};

pub(super) const DELETE_CONFIRM_MESSAGE: &str = "Tem certeza que deseja excluir este gasto fixo?";

/// The state needed for the fixed expenses page.
#[derive(Debug, Clone)]
pub struct FixedExpensesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for FixedExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The month selector of the fixed expenses page.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The Portuguese name of the month, e.g. "Outubro".
    pub month: Option<String>,
}

/// The URL of the fixed expenses page for `month`.
pub(crate) fn month_page_url(month: Month) -> String {
    match serde_urlencoded::to_string([("month", month_name(month))]) {
        Ok(query) => format!("{}?{query}", endpoints::FIXED_EXPENSES_VIEW),
        Err(error) => {
            tracing::error!("could not encode month {month}: {error}");
            endpoints::FIXED_EXPENSES_VIEW.to_owned()
        }
    }
}

/// Render the fixed expenses of the selected month, or the current local month.
pub async fn get_fixed_expenses_page(
    State(state): State<FixedExpensesPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let current_month = get_local_today(&state.local_timezone)?.month();

    let month = match query.month.as_deref().map(parse_month_name) {
        Some(Ok(month)) => month,
        Some(Err(error)) => {
            tracing::warn!("falling back to the current month: {error}");
            current_month
        }
        None => current_month,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_fixed_expenses_for_month(user_id, month, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve fixed expenses: {error}"))?;

    Ok(fixed_expenses_view(month, &expenses).into_response())
}

fn fixed_expenses_view(month: Month, expenses: &[FixedExpense]) -> Markup {
    let nav_bar = NavBar::new(endpoints::FIXED_EXPENSES_VIEW).into_html();
    let total = month_total(expenses);

    let table_row = |expense: &FixedExpense| {
        let edit_url = format_endpoint(endpoints::EDIT_FIXED_EXPENSE_VIEW, expense.id);
        let delete_url = format_endpoint(endpoints::FIXED_EXPENSE, expense.id);
        let (description, tooltip) = truncate_description(&expense.description);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
                td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            DELETE_CONFIRM_MESSAGE,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Gastos Fixos" }

                    form method="get" action=(endpoints::FIXED_EXPENSES_VIEW) class="flex items-end gap-2"
                    {
                        label for="month-selector" class=(FORM_LABEL_STYLE) { "Mês" }

                        select
                            id="month-selector"
                            name="month"
                            onchange="this.form.submit()"
                            class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for option_month in all_months() {
                                option value=(month_name(*option_month)) selected[*option_month == month]
                                {
                                    (month_name(*option_month))
                                }
                            }
                        }

                        noscript { button type="submit" { "Ver" } }
                    }
                }

                div class=(CARD_STYLE)
                {
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Total de " (month_name(month))
                    }
                    p id="month-total" class="text-2xl font-bold" { (format_currency(total)) }
                }

                @if expenses.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "Nenhum gasto fixo em " (month_name(month)) "."
                    }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Descrição" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Valor" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Ações" }
                            }
                        }

                        tbody
                        {
                            @for expense in expenses {
                                (table_row(expense))
                            }
                        }
                    }
                }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Adicionar gasto fixo" }

                    form
                        hx-post=(endpoints::FIXED_EXPENSES_API)
                        class="space-y-4"
                    {
                        (fixed_expense_form_fields(None, None, month))

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Adicionar" }
                    }
                }
            }
        }
    );

    base("Gastos Fixos", &[currency_input_styles()], &content)
}
