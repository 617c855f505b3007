use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{Plan, UserID, set_plan},
};

/// The state needed for upgrading the user's plan.
#[derive(Debug, Clone)]
pub struct UpgradePlanState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpgradePlanState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Move `user_id` to the Pro plan. Upgrading a Pro user does nothing.
///
/// # Errors
///
/// Returns [Error::UpdateMissingUser] if the user does not exist.
pub fn upgrade_to_pro(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    set_plan(user_id, Plan::Pro, connection)
}

/// Upgrade the user to Pro and have htmx reload the page so it shows the new plan.
pub async fn upgrade_plan_endpoint(
    State(state): State<UpgradePlanState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match upgrade_to_pro(user_id, &connection) {
        Ok(()) => {
            tracing::info!("user {user_id} upgraded to Pro");

            (
                HxRefresh(true),
                Alert::SuccessSimple {
                    message: "Bem-vindo ao plano Pro!".to_owned(),
                },
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not upgrade user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, Plan, UserID, create_user, get_user_by_id},
        db::initialize,
        test_utils::get_header,
    };

    use super::{UpgradePlanState, upgrade_plan_endpoint, upgrade_to_pro};

    fn get_connection_with_user() -> (Connection, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(
            "ana@example.com",
            "",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (connection, user.id)
    }

    #[test]
    fn new_users_start_free_and_upgrade_to_pro() {
        let (connection, user_id) = get_connection_with_user();
        assert_eq!(get_user_by_id(user_id, &connection).unwrap().plan, Plan::Free);

        upgrade_to_pro(user_id, &connection).unwrap();

        assert_eq!(get_user_by_id(user_id, &connection).unwrap().plan, Plan::Pro);
    }

    #[test]
    fn upgrading_twice_keeps_pro() {
        let (connection, user_id) = get_connection_with_user();

        upgrade_to_pro(user_id, &connection).unwrap();
        upgrade_to_pro(user_id, &connection).unwrap();

        assert_eq!(get_user_by_id(user_id, &connection).unwrap().plan, Plan::Pro);
    }

    #[tokio::test]
    async fn endpoint_refreshes_page() {
        let (connection, user_id) = get_connection_with_user();
        let state = UpgradePlanState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = upgrade_plan_endpoint(State(state.clone()), Extension(user_id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "hx-refresh"), "true");
        assert_eq!(
            get_user_by_id(user_id, &state.db_connection.lock().unwrap())
                .unwrap()
                .plan,
            Plan::Pro
        );
    }

    #[tokio::test]
    async fn endpoint_reports_missing_user() {
        let (connection, _) = get_connection_with_user();
        let state = UpgradePlanState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = upgrade_plan_endpoint(State(state), Extension(UserID::new(42))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
