use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    fixed_expense::{
        FixedExpense, FixedExpenseId, create::fixed_expense_form_fields,
        domain::FixedExpenseFormData, get_fixed_expense, list::month_page_url,
        update_fixed_expense,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles, loading_spinner},
    navigation::NavBar,
};

/// The state needed for editing a fixed expense.
#[derive(Debug, Clone)]
pub struct EditFixedExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditFixedExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a fixed expense.
pub async fn get_edit_fixed_expense_page(
    State(state): State<EditFixedExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<FixedExpenseId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_fixed_expense(user_id, expense_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve fixed expense {expense_id}: {error}");
        }
    })?;

    Ok(edit_fixed_expense_view(&expense).into_response())
}

fn edit_fixed_expense_view(expense: &FixedExpense) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_FIXED_EXPENSE_VIEW).into_html();
    let update_endpoint = format_endpoint(endpoints::FIXED_EXPENSE, expense.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Editar gasto fixo" }

                (fixed_expense_form_fields(Some(&expense.description), Some(expense.amount), expense.month))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Salvar alterações"
                }
            }
        }
    };

    base("Editar gasto fixo", &[currency_input_styles()], &content)
}

/// Save the changes to a fixed expense and redirect to the page of its month.
pub async fn update_fixed_expense_endpoint(
    State(state): State<EditFixedExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<FixedExpenseId>,
    Form(form): Form<FixedExpenseFormData>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            tracing::warn!("rejected edit of fixed expense {expense_id}: {error}");
            return error.into_alert_response();
        }
    };
    let month = builder.month;

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_fixed_expense(user_id, expense_id, builder, &connection) {
        Ok(()) => (HxRedirect(month_page_url(month)), StatusCode::SEE_OTHER).into_response(),
        Err(error @ (Error::UpdateMissingFixedExpense
        | Error::EmptyDescription
        | Error::NonPositiveAmount(_))) => {
            tracing::warn!("Could not update fixed expense {expense_id}: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not update fixed expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
