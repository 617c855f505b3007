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
    wishlist::{WishlistItemId, delete_wishlist_item},
};

/// The state needed to delete a wishlist item.
#[derive(Debug, Clone)]
pub struct DeleteWishlistItemState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteWishlistItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a wishlist item and respond with an alert.
pub async fn delete_wishlist_item_endpoint(
    State(state): State<DeleteWishlistItemState>,
    Extension(user_id): Extension<UserID>,
    Path(item_id): Path<WishlistItemId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_wishlist_item(user_id, item_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Item excluído".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingWishlistItem) => {
            Error::DeleteMissingWishlistItem.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not delete wishlist item {item_id}: {error}");
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

    use crate::{
        Error,
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        wishlist::{WishlistItem, create_wishlist_item, get_wishlist_item},
    };

    use super::{DeleteWishlistItemState, delete_wishlist_item_endpoint};

    fn get_state() -> (DeleteWishlistItemState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(
            "test@test.com",
            "",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (
            DeleteWishlistItemState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn deletes_item() {
        let (state, user_id) = get_state();
        let item = create_wishlist_item(
            user_id,
            WishlistItem::build("Notebook", 3500.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response =
            delete_wishlist_item_endpoint(State(state.clone()), Extension(user_id), Path(item.id))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_wishlist_item(user_id, item.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn missing_item_returns_not_found() {
        let (state, user_id) = get_state();

        let response =
            delete_wishlist_item_endpoint(State(state), Extension(user_id), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
