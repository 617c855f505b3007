//! Fixed expense creation endpoint and the form fields shared with the edit page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use time::Month;

use crate::{
    AppState, Error,
    auth::UserID,
    fixed_expense::{create_fixed_expense, domain::FixedExpenseFormData, list::month_page_url},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    month::{all_months, month_name},
};

/// The state needed for creating a fixed expense.
#[derive(Debug, Clone)]
pub struct CreateFixedExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateFixedExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle the add fixed expense form, redirecting to the page of the expense's month.
pub async fn create_fixed_expense_endpoint(
    State(state): State<CreateFixedExpenseState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<FixedExpenseFormData>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            tracing::warn!("rejected fixed expense form: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_fixed_expense(user_id, builder, &connection) {
        Ok(expense) => (
            HxRedirect(month_page_url(expense.month)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::EmptyDescription | Error::NonPositiveAmount(_))) => {
            tracing::warn!("rejected fixed expense: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a fixed expense: {error}");
            error.into_alert_response()
        }
    }
}

/// The description, amount and month inputs of the fixed expense forms.
pub(super) fn fixed_expense_form_fields(
    description: Option<&str>,
    amount: Option<f64>,
    selected_month: Month,
) -> Markup {
    let amount_str = amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Descrição" }

            input
                id="description"
                type="text"
                name="description"
                placeholder="Ex: Aluguel"
                value=[description]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Valor" }

            div class="input-wrapper w-full"
            {
                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0,00"
                    value=[amount_str.as_deref()]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="month" class=(FORM_LABEL_STYLE) { "Mês" }

            select id="month" name="month" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for month in all_months() {
                    option value=(month_name(*month)) selected[*month == selected_month]
                    {
                        (month_name(*month))
                    }
                }
            }
        }
    }
}
