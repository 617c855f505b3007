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
    fixed_expense::{FixedExpenseId, delete_fixed_expense},
};

/// The state needed to delete a fixed expense.
#[derive(Debug, Clone)]
pub struct DeleteFixedExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteFixedExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a fixed expense and respond with an alert.
pub async fn delete_fixed_expense_endpoint(
    State(state): State<DeleteFixedExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<FixedExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_fixed_expense(user_id, expense_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Gasto fixo excluído".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingFixedExpense) => {
            tracing::warn!("tried to delete missing fixed expense {expense_id}");
            Error::DeleteMissingFixedExpense.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not delete fixed expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
