use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, normalize_redirect_url},
    endpoints,
    transaction::{
        core::{TransactionId, update_transaction},
        edit_page::RedirectQuery,
        form::TransactionForm,
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Save the changes to a transaction and redirect to `redirect_url`, or the
/// transactions page if it is missing or not a local URL.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Query(query_params): Query<RedirectQuery>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            tracing::warn!("rejected edit of transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(user_id, transaction_id, builder, &connection) {
        Ok(()) => {}
        Err(Error::UpdateMissingTransaction) => {
            tracing::warn!(
                "Could not update transaction {transaction_id}: update returned zero rows affected"
            );
            return Error::UpdateMissingTransaction.into_alert_response();
        }
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    }

    let redirect_url = query_params
        .redirect_url
        .as_deref()
        .and_then(normalize_redirect_url)
        .unwrap_or_else(|| endpoints::TRANSACTIONS_VIEW.to_owned());

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}
