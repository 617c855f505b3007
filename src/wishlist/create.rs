use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
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
    category::Category,
    endpoints,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    wishlist::{create_wishlist_item, domain::WishlistItemFormData},
};

/// The state needed for adding a wishlist item.
#[derive(Debug, Clone)]
pub struct CreateWishlistItemState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateWishlistItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle the add item form, redirecting back to the wishlist page.
pub async fn create_wishlist_item_endpoint(
    State(state): State<CreateWishlistItemState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<WishlistItemFormData>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            tracing::warn!("rejected wishlist form: {error}");
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

    match create_wishlist_item(user_id, builder, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::WISHLIST_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(
            error @ (Error::EmptyDescription
            | Error::NonPositiveAmount(_)
            | Error::InvalidCategory(_)),
        ) => {
            tracing::warn!("rejected wishlist item: {error}");
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a wishlist item: {error}");
            error.into_alert_response()
        }
    }
}

/// The description, amount and category inputs of the wishlist forms.
pub(super) fn wishlist_item_form_fields(
    description: Option<&str>,
    amount: Option<f64>,
    selected_category: Category,
) -> Markup {
    let amount_str = amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Descrição" }

            input
                id="description"
                type="text"
                name="description"
                placeholder="Ex: Notebook"
                value=[description]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Valor" }

            div class="input-wrapper w-full"
            {
                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0,00"
                    value=[amount_str.as_deref()]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Categoria" }

            select id="category" name="category" class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in Category::expense_categories() {
                    option value=(category.label()) selected[*category == selected_category]
                    {
                        (category.emoji()) " " (category.label())
                    }
                }
            }
        }
    }
}
