//! Conta Fácil is a web app for tracking personal finances.
//!
//! Users record income and expenses, keep a list of fixed monthly expenses
//! and a wishlist, and see summaries, reports and calendars of their money.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod calculator;
mod calendar;
mod category;
mod course;
mod db;
mod dashboard;
mod endpoints;
mod fixed_expense;
mod html;
mod internal_server_error;
mod logging;
mod month;
mod navigation;
mod not_found;
mod pagination;
mod reports;
mod routing;
mod settings;
mod timezone;
mod transaction;
mod wishlist;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, Plan, User, UserID, ValidatedPassword, create_user, get_user_by_email,
    update_password,
};
pub use category::Category;
pub use db::initialize as initialize_db;
pub use fixed_expense::{FixedExpense, create_fixed_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use transaction::{Transaction, TransactionType, create_transaction};
pub use wishlist::{WishlistItem, create_wishlist_item};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email and password combination that does not
    /// match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The auth cookie could not be decoded or encoded.
    #[error("invalid auth token: {0}")]
    InvalidToken(String),

    /// The user provided a password that is too short or too easy to guess.
    ///
    /// The message is shown to the user as is.
    #[error("{0}")]
    TooWeak(String),

    /// The new password and its confirmation differ.
    #[error("the passwords do not match")]
    PasswordMismatch,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email address is already used by another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The email address is not plausibly an email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// An empty string was used for a description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// An amount of zero or less was used where a positive amount is needed.
    #[error("{0} is not a positive amount")]
    NonPositiveAmount(f64),

    /// A category label did not match a known category, or the category
    /// cannot be used with the transaction type.
    #[error("invalid category \"{0}\"")]
    InvalidCategory(String),

    /// A month name or year-month string could not be parsed.
    #[error("invalid month \"{0}\"")]
    InvalidMonth(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a user that does not exist
    #[error("tried to update a user that is not in the database")]
    UpdateMissingUser,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a fixed expense that does not exist
    #[error("tried to update a fixed expense that is not in the database")]
    UpdateMissingFixedExpense,

    /// Tried to delete a fixed expense that does not exist
    #[error("tried to delete a fixed expense that is not in the database")]
    DeleteMissingFixedExpense,

    /// Tried to update a wishlist item that does not exist
    #[error("tried to update a wishlist item that is not in the database")]
    UpdateMissingWishlistItem,

    /// Tried to delete a wishlist item that does not exist
    #[error("tried to delete a wishlist item that is not in the database")]
    DeleteMissingWishlistItem,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Fuso horário inválido",
                fix: &format!(
                    "Não foi possível obter o fuso horário \"{timezone}\". Verifique as \
                    configurações do servidor e use um nome de fuso horário canónico."
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, message, details) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Fuso horário inválido",
                format!(
                    "Não foi possível obter o fuso horário \"{timezone}\". Verifique as \
                    configurações do servidor."
                ),
            ),
            Error::EmptyDescription => (
                StatusCode::BAD_REQUEST,
                "Descrição inválida",
                "A descrição não pode ficar vazia.".to_owned(),
            ),
            Error::NonPositiveAmount(amount) => (
                StatusCode::BAD_REQUEST,
                "Valor inválido",
                format!("O valor deve ser maior que zero, recebido {amount}."),
            ),
            Error::InvalidCategory(category) => (
                StatusCode::BAD_REQUEST,
                "Categoria inválida",
                format!("A categoria \"{category}\" não pode ser usada aqui."),
            ),
            Error::InvalidMonth(month) => (
                StatusCode::BAD_REQUEST,
                "Mês inválido",
                format!("\"{month}\" não é um mês válido."),
            ),
            Error::TooWeak(reason) => (
                StatusCode::BAD_REQUEST,
                "Senha inválida",
                reason,
            ),
            Error::PasswordMismatch => (
                StatusCode::BAD_REQUEST,
                "Senha inválida",
                "As senhas não coincidem.".to_owned(),
            ),
            Error::UpdateMissingUser => (
                StatusCode::NOT_FOUND,
                "Não foi possível atualizar o perfil",
                "O utilizador não foi encontrado.".to_owned(),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Não foi possível atualizar o lançamento",
                "Lançamento não encontrado.".to_owned(),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Não foi possível excluir o lançamento",
                "Lançamento não encontrado. \
                Atualize a página para ver se ele já foi excluído."
                    .to_owned(),
            ),
            Error::UpdateMissingFixedExpense => (
                StatusCode::NOT_FOUND,
                "Não foi possível atualizar o gasto fixo",
                "Gasto fixo não encontrado.".to_owned(),
            ),
            Error::DeleteMissingFixedExpense => (
                StatusCode::NOT_FOUND,
                "Não foi possível excluir o gasto fixo",
                "Gasto fixo não encontrado. \
                Atualize a página para ver se ele já foi excluído."
                    .to_owned(),
            ),
            Error::UpdateMissingWishlistItem => (
                StatusCode::NOT_FOUND,
                "Não foi possível atualizar o item",
                "Item da lista de desejos não encontrado.".to_owned(),
            ),
            Error::DeleteMissingWishlistItem => (
                StatusCode::NOT_FOUND,
                "Não foi possível excluir o item",
                "Item da lista de desejos não encontrado. \
                Atualize a página para ver se ele já foi excluído."
                    .to_owned(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Algo deu errado",
                "Ocorreu um erro inesperado, verifique os registos do servidor.".to_owned(),
            ),
        };

        (
            status_code,
            Alert::Error {
                message: message.to_owned(),
                details,
            },
        )
            .into_response()
    }
}
