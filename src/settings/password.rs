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
    auth::{PasswordHash, UserID, ValidatedPassword, update_password},
};

/// The state needed for changing the user's password.
#[derive(Debug, Clone)]
pub struct ChangePasswordState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ChangePasswordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    pub password: String,
    pub confirm_password: String,
}

/// Check `new_password` against `confirm_password` and hash it.
///
/// # Errors
///
/// This function will return a:
/// - [Error::PasswordMismatch] if `new_password` and `confirm_password` differ,
/// - [Error::TooWeak] if the password is too short or too easy to guess,
/// - or [Error::HashingError] if the password could not be hashed.
pub fn hash_new_password(
    new_password: &str,
    confirm_password: &str,
    hash_cost: u32,
) -> Result<PasswordHash, Error> {
    if new_password != confirm_password {
        return Err(Error::PasswordMismatch);
    }

    let password = ValidatedPassword::new(new_password)?;

    PasswordHash::new(password, hash_cost)
}

pub async fn change_password_endpoint(
    State(state): State<ChangePasswordState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ChangePasswordForm>,
) -> Response {
    // bcrypt is slow, so the hash is computed before taking the database lock.
    let password_hash = match hash_new_password(
        &form.password,
        &form.confirm_password,
        PasswordHash::DEFAULT_COST,
    ) {
        Ok(password_hash) => password_hash,
        Err(error @ (Error::PasswordMismatch | Error::TooWeak(_))) => {
            tracing::warn!("rejected new password for user {user_id}: {error}");
            return error.into_alert_response();
        }
        Err(error) => {
            tracing::error!("could not hash the new password of user {user_id}: {error}");
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

    match update_password(user_id, &password_hash, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Senha atualizada com sucesso!".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("could not change the password of user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}
