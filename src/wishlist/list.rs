//! The wishlist page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::Category,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, CATEGORY_BADGE_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, currency_input_styles,
        edit_delete_action_links, format_currency, truncate_description,
    },
    navigation::NavBar,
    wishlist::{WishlistItem, create::wishlist_item_form_fields, get_wishlist, wishlist_total},
};

/// The state needed for the wishlist page.
#[derive(Debug, Clone)]
pub struct WishlistPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for WishlistPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the user's wishlist with its total and a form for adding items.
pub async fn get_wishlist_page(
    State(state): State<WishlistPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let items = get_wishlist(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve wishlist: {error}"))?;

    Ok(wishlist_view(&items).into_response())
}

/// A table row for `item`. The purchased checkbox replaces the row with the toggled one.
pub(super) fn wishlist_row(item: &WishlistItem) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_WISHLIST_ITEM_VIEW, item.id);
    let delete_url = format_endpoint(endpoints::WISHLIST_ITEM, item.id);
    let toggle_url = format_endpoint(endpoints::TOGGLE_WISHLIST_ITEM, item.id);
    let (description, tooltip) = truncate_description(&item.description);
    let description_style = if item.purchased {
        "line-through text-gray-400"
    } else {
        ""
    };

    html!(
        tr class=(TABLE_ROW_STYLE) data-purchased=(if item.purchased { "true" } else { "false" })
        {
            td class=(TABLE_CELL_STYLE)
            {
                input
                    type="checkbox"
                    aria-label="Comprado"
                    checked[item.purchased]
                    hx-post=(toggle_url)
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    class="w-4 h-4 cursor-pointer";
            }
            td class={(TABLE_CELL_STYLE) " " (description_style)} title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE)
                {
                    (item.category.emoji()) " " (item.category.label())
                }
            }
            td class=(TABLE_CELL_STYLE) { (format_currency(item.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        "Tem certeza que deseja excluir este item da lista de desejos?",
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    )
}

fn wishlist_view(items: &[WishlistItem]) -> Markup {
    let nav_bar = NavBar::new(endpoints::WISHLIST_VIEW).into_html();
    let total = wishlist_total(items);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                h1 class="text-xl font-bold" { "Lista de Desejos" }

                div class=(CARD_STYLE)
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Total da lista" }
                    p id="wishlist-total" class="text-2xl font-bold" { (format_currency(total)) }
                }

                @if items.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "Sua lista de desejos está vazia."
                    }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Comprado" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Descrição" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Categoria" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Valor" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Ações" }
                            }
                        }

                        tbody
                        {
                            @for item in items {
                                (wishlist_row(item))
                            }
                        }
                    }
                }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Adicionar item" }

                    form hx-post=(endpoints::WISHLIST_API) class="space-y-4"
                    {
                        (wishlist_item_form_fields(None, None, Category::Compras))

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Adicionar" }
                    }
                }
            }
        }
    );

    base("Lista de Desejos", &[currency_input_styles()], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
        wishlist::{WishlistItem, create_wishlist_item, toggle_purchased},
    };

    use super::{WishlistPageState, get_wishlist_page};

    fn get_state() -> (WishlistPageState, UserID) {
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
            WishlistPageState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn shows_items_with_toggles() {
        let (state, user_id) = get_state();
        let (notebook, bike) = {
            let connection = state.db_connection.lock().unwrap();
            let notebook =
                create_wishlist_item(user_id, WishlistItem::build("Notebook", 3500.0), &connection)
                    .unwrap();
            let bike =
                create_wishlist_item(user_id, WishlistItem::build("Bike", 900.0), &connection)
                    .unwrap();
            toggle_purchased(user_id, bike.id, &connection).unwrap();
            (notebook, bike)
        };

        let response = get_wishlist_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let rows: Vec<_> = html.select(&Selector::parse("tbody tr").unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value().attr("data-purchased"), Some("false"));
        assert_eq!(rows[1].value().attr("data-purchased"), Some("true"));

        let checkbox_selector = Selector::parse("input[type=checkbox]").unwrap();
        for (row, item) in rows.iter().zip([&notebook, &bike]) {
            let checkbox = row.select(&checkbox_selector).next().unwrap();
            assert_eq!(
                checkbox.value().attr("hx-post"),
                Some(format_endpoint(endpoints::TOGGLE_WISHLIST_ITEM, item.id).as_str())
            );
        }

        let total = html
            .select(&Selector::parse("#wishlist-total").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert_eq!(total, "R$ 4.400,00");
    }

    #[tokio::test]
    async fn empty_wishlist_shows_message_and_form() {
        let (state, user_id) = get_state();

        let response = get_wishlist_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Sua lista de desejos está vazia."));

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::WISHLIST_API, "hx-post");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_submit_button(&form);
    }
}
