use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    wishlist::{WishlistItemId, list::wishlist_row, toggle_purchased},
};

/// The state needed to mark a wishlist item as purchased or not.
#[derive(Debug, Clone)]
pub struct ToggleWishlistItemState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ToggleWishlistItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Flip the purchased flag of an item and respond with its updated table row.
pub async fn toggle_wishlist_item_endpoint(
    State(state): State<ToggleWishlistItemState>,
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

    match toggle_purchased(user_id, item_id, &connection) {
        Ok(item) => wishlist_row(&item).into_response(),
        Err(Error::UpdateMissingWishlistItem) => {
            tracing::warn!("tried to toggle missing wishlist item {item_id}");
            Error::UpdateMissingWishlistItem.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not toggle wishlist item {item_id}: {error}");
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
    use scraper::Selector;

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        test_utils::{assert_status_ok, parse_html_fragment},
        wishlist::{WishlistItem, create_wishlist_item, get_wishlist_item},
    };

    use super::{ToggleWishlistItemState, toggle_wishlist_item_endpoint};

    fn get_state() -> (ToggleWishlistItemState, UserID) {
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
            ToggleWishlistItemState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn toggles_and_returns_row() {
        let (state, user_id) = get_state();
        let item = create_wishlist_item(
            user_id,
            WishlistItem::build("Notebook", 3500.0),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response =
            toggle_wishlist_item_endpoint(State(state.clone()), Extension(user_id), Path(item.id))
                .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let checkbox = html
            .select(&Selector::parse("input[type=checkbox]").unwrap())
            .next()
            .expect("no checkbox in row");
        assert!(checkbox.value().attr("checked").is_some());
        assert!(
            get_wishlist_item(user_id, item.id, &state.db_connection.lock().unwrap())
                .unwrap()
                .purchased
        );
    }

    #[tokio::test]
    async fn missing_item_returns_not_found() {
        let (state, user_id) = get_state();

        let response =
            toggle_wishlist_item_endpoint(State(state), Extension(user_id), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
