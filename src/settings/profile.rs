use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{UserID, update_name},
};

/// The state needed for changing the user's name.
#[derive(Debug, Clone)]
pub struct UpdateNameState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateNameState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
}

/// Set the user's display name. An empty name clears it.
pub async fn update_name_endpoint(
    State(state): State<UpdateNameState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<NameForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_name(user_id, &form.name, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Nome atualizado com sucesso!".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("could not update the name of user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}
