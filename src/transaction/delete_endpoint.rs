use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::UserID,
    transaction::core::{TransactionId, delete_transaction},
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with an alert.
///
/// The success response has the status 200 OK so that htmx removes the row.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(user_id, transaction_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Lançamento excluído".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingTransaction) => {
            Error::DeleteMissingTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, create_user},
        initialize_db,
        test_utils::{assert_valid_html, parse_html_fragment},
        transaction::{Transaction, TransactionType, create_transaction, core::get_transaction},
    };

    use super::{DeleteTransactionState, delete_transaction_endpoint};

    fn get_test_state() -> (DeleteTransactionState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let user = create_user(
            "test@test.com",
            "",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (
            DeleteTransactionState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let (state, user_id) = get_test_state();
        let transaction = create_transaction(
            user_id,
            Transaction::build(TransactionType::Expense, 1.23, date!(2025 - 10 - 26), "Test"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response =
            delete_transaction_endpoint(State(state.clone()), Extension(user_id), Path(transaction.id))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_transaction(user_id, transaction.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn missing_transaction_returns_error_alert() {
        let (state, user_id) = get_test_state();

        let response = delete_transaction_endpoint(State(state), Extension(user_id), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("Não foi possível excluir o lançamento"),
            "got alert text {text:?}"
        );
    }

    #[tokio::test]
    async fn cannot_delete_other_users_transaction() {
        let (state, user_id) = get_test_state();
        let transaction = create_transaction(
            user_id,
            Transaction::build(TransactionType::Expense, 1.23, date!(2025 - 10 - 26), "Test"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(UserID::new(user_id.as_i64() + 1)),
            Path(transaction.id),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            get_transaction(user_id, transaction.id, &state.db_connection.lock().unwrap()),
            Ok(transaction)
        );
    }
}
