//! The page listing a user's transactions, filtered by category and split into pages.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    category::Category,
    endpoints::{self, format_endpoint},
    html::{
        CATEGORY_BADGE_STYLE, EXPENSE_TEXT_STYLE, INCOME_TEXT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links, format_date, format_signed_currency, truncate_description,
    },
    navigation::NavBar,
    pagination::{
        PageQuery, PageWindow, PaginationConfig, create_pagination_indicators, pagination_view,
    },
    transaction::core::{Transaction, TransactionFilter, count_transactions, get_transactions},
};

const DELETE_CONFIRM_MESSAGE: &str = "Tem certeza que deseja excluir este lançamento?";

const CHIP_STYLE: &str = "inline-flex items-center gap-1 px-3 py-1 rounded-full text-sm \
    border border-gray-300 text-gray-700 hover:bg-gray-100 \
    dark:border-gray-600 dark:text-gray-300 dark:hover:bg-gray-700";

const CHIP_ACTIVE_STYLE: &str = "inline-flex items-center gap-1 px-3 py-1 rounded-full text-sm \
    border border-blue-600 bg-blue-600 text-white hover:bg-blue-500";

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters for the transactions page.
///
/// `category` may be repeated to select several categories.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default)]
    pub category: Vec<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Render a page of the user's transactions.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let selected_categories = parse_selected_categories(&query.category);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let row_count = count_transactions(user_id, &selected_categories, &connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;

    let window = PageWindow::new(
        &PageQuery {
            page: query.page,
            per_page: query.per_page,
        },
        &state.pagination_config,
        row_count,
    );

    let transactions = get_transactions(
        user_id,
        &TransactionFilter {
            categories: selected_categories.clone(),
            date_range: None,
            limit: Some(window.per_page),
            offset: window.offset(),
        },
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let view = TransactionsView {
        transactions: &transactions,
        selected_categories: &selected_categories,
        window,
        max_pages: state.pagination_config.max_pages,
    };

    Ok(view.into_html().into_response())
}

/// Parse the category labels, dropping unknown labels and duplicates.
fn parse_selected_categories(labels: &[String]) -> Vec<Category> {
    let mut categories = Vec::new();

    for label in labels {
        match label.parse::<Category>() {
            Ok(category) if !categories.contains(&category) => categories.push(category),
            Ok(_) => {}
            Err(error) => tracing::warn!("ignoring category filter: {error}"),
        }
    }

    categories
}

/// Build the URL of the transactions page for `categories` and `page`.
fn transactions_url(categories: &[Category], page: Option<u64>, per_page: u64) -> String {
    let mut params: Vec<(&str, String)> = categories
        .iter()
        .map(|category| ("category", category.label().to_owned()))
        .collect();

    if let Some(page) = page {
        params.push(("page", page.to_string()));
        params.push(("per_page", per_page.to_string()));
    }

    if params.is_empty() {
        return endpoints::TRANSACTIONS_VIEW.to_owned();
    }

    match serde_urlencoded::to_string(&params) {
        Ok(query_string) => format!("{}?{query_string}", endpoints::TRANSACTIONS_VIEW),
        Err(error) => {
            tracing::error!("could not encode transactions page query: {error}");
            endpoints::TRANSACTIONS_VIEW.to_owned()
        }
    }
}

/// The selection with `category` added if absent, or removed if present.
fn toggle_category(selected: &[Category], category: Category) -> Vec<Category> {
    if selected.contains(&category) {
        selected
            .iter()
            .copied()
            .filter(|selected_category| *selected_category != category)
            .collect()
    } else {
        let mut toggled = selected.to_vec();
        toggled.push(category);
        toggled
    }
}

struct TransactionsView<'a> {
    transactions: &'a [Transaction],
    selected_categories: &'a [Category],
    window: PageWindow,
    max_pages: u64,
}

impl TransactionsView<'_> {
    fn into_html(self) -> Markup {
        let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
        let current_url = transactions_url(
            self.selected_categories,
            Some(self.window.page),
            self.window.per_page,
        );
        let redirect_param = serde_urlencoded::to_string([("redirect_url", &current_url)])
            .inspect_err(|error| tracing::error!("could not encode redirect URL: {error}"))
            .ok();
        let indicators =
            create_pagination_indicators(self.window.page, self.window.page_count, self.max_pages);
        let selected_categories = self.selected_categories;
        let per_page = self.window.per_page;

        let content = html! {
            (nav_bar)

            main class=(PAGE_CONTAINER_STYLE)
            {
                section class="space-y-4"
                {
                    header class="flex justify-between flex-wrap items-end"
                    {
                        h1 class="text-xl font-bold" { "Meus Lançamentos" }

                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                        {
                            "Novo lançamento"
                        }
                    }

                    (category_filter_view(selected_categories))

                    @if self.transactions.is_empty() {
                        p class="text-center text-gray-500 dark:text-gray-400"
                        {
                            "Nenhum lançamento encontrado."
                        }
                    } @else {
                        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Descrição" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Data" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Categoria" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Valor" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Ações" }
                                }
                            }

                            tbody
                            {
                                @for transaction in self.transactions {
                                    (transaction_row(transaction, redirect_param.as_deref()))
                                }
                            }
                        }

                        (pagination_view(&indicators, |page| {
                            transactions_url(selected_categories, Some(page), per_page)
                        }))
                    }
                }
            }
        };

        base("Meus Lançamentos", &[], &content)
    }
}

fn category_filter_view(selected_categories: &[Category]) -> Markup {
    html! {
        nav aria-label="Filtrar por categoria" class="flex flex-wrap gap-2"
        {
            @for category in Category::all() {
                @let is_selected = selected_categories.contains(category);
                @let url = transactions_url(&toggle_category(selected_categories, *category), None, 0);

                a
                    href=(url)
                    class=(if is_selected { CHIP_ACTIVE_STYLE } else { CHIP_STYLE })
                    aria-pressed=(is_selected)
                {
                    (category.emoji()) " " (category.label())
                }
            }

            @if !selected_categories.is_empty() {
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Limpar filtros" }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction, redirect_param: Option<&str>) -> Markup {
    let edit_url = {
        let url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
        match redirect_param {
            Some(redirect_param) => format!("{url}?{redirect_param}"),
            None => url,
        }
    };
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let (description, tooltip) = truncate_description(&transaction.description);
    let amount_style = if transaction.is_expense() {
        EXPENSE_TEXT_STYLE
    } else {
        INCOME_TEXT_STYLE
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE) { (format_date(transaction.date)) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE)
                {
                    (transaction.category.emoji()) " " (transaction.category.label())
                }
            }
            td class={ (TABLE_CELL_STYLE) " " (amount_style) }
            {
                (format_signed_currency(transaction.amount, transaction.is_expense()))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        DELETE_CONFIRM_MESSAGE,
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    }
}
