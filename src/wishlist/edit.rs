use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles, loading_spinner},
    navigation::NavBar,
    wishlist::{
        WishlistItem, WishlistItemId, create::wishlist_item_form_fields,
        domain::WishlistItemFormData, get_wishlist_item, update_wishlist_item,
    },
};

/// The state needed for editing a wishlist item.
#[derive(Debug, Clone)]
pub struct EditWishlistItemState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditWishlistItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a wishlist item.
pub async fn get_edit_wishlist_item_page(
    State(state): State<EditWishlistItemState>,
    Extension(user_id): Extension<UserID>,
    Path(item_id): Path<WishlistItemId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let item = get_wishlist_item(user_id, item_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve wishlist item {item_id}: {error}");
        }
    })?;

    Ok(edit_wishlist_item_view(&item).into_response())
}

fn edit_wishlist_item_view(item: &WishlistItem) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_WISHLIST_ITEM_VIEW).into_html();
    let update_endpoint = format_endpoint(endpoints::WISHLIST_ITEM, item.id);

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
                h2 class="text-xl font-bold" { "Editar item" }

                (wishlist_item_form_fields(Some(&item.description), Some(item.amount), item.category))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Salvar alterações"
                }
            }
        }
    };

    base("Editar item", &[currency_input_styles()], &content)
}

/// Save the changes to a wishlist item and redirect to the wishlist.
pub async fn update_wishlist_item_endpoint(
    State(state): State<EditWishlistItemState>,
    Extension(user_id): Extension<UserID>,
    Path(item_id): Path<WishlistItemId>,
    Form(form): Form<WishlistItemFormData>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            tracing::warn!("rejected edit of wishlist item {item_id}: {error}");
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

    match update_wishlist_item(user_id, item_id, builder, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::WISHLIST_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::UpdateMissingWishlistItem
            | Error::EmptyDescription
            | Error::NonPositiveAmount(_)
            | Error::InvalidCategory(_)),
        ) => {
            tracing::warn!("Could not update wishlist item {item_id}: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not update wishlist item {item_id}: {error}");
            error.into_alert_response()
        }
    }
}
