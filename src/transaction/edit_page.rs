use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles, loading_spinner},
    navigation::NavBar,
    transaction::{
        core::{Transaction, TransactionId, get_transaction},
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for accessing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The page to go back to once the transaction is saved.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(user_id, transaction_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
        }
    })?;

    let mut update_endpoint = format_endpoint(endpoints::TRANSACTION, transaction_id);

    if let Some(redirect_url) = query.redirect_url.as_deref() {
        match serde_urlencoded::to_string([("redirect_url", redirect_url)]) {
            Ok(query_string) => {
                update_endpoint.push('?');
                update_endpoint.push_str(&query_string);
            }
            Err(error) => tracing::error!("could not encode redirect URL {redirect_url}: {error}"),
        }
    }

    Ok(edit_transaction_view(&transaction, &update_endpoint).into_response())
}

fn edit_transaction_view(transaction: &Transaction, update_endpoint: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        transaction_type: transaction.transaction_type,
        amount: Some(transaction.amount),
        date: transaction.date,
        description: Some(&transaction.description),
        category: Some(transaction.category),
        autofocus_amount: false,
    });

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
                h2 class="text-xl font-bold" { "Editar lançamento" }

                (form_fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Salvar alterações"
                }
            }
        }
    };

    base("Editar lançamento", &[currency_input_styles()], &content)
}
