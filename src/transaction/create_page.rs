//! Defines the route handler for the page for creating a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles, loading_spinner},
    navigation::NavBar,
    timezone::get_local_today,
    transaction::{
        core::TransactionType,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

fn create_transaction_view(today: Date) -> Markup {
    let create_transaction_route = endpoints::TRANSACTIONS_API;
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let spinner = loading_spinner();
    let form_fields = transaction_form_fields(&TransactionFormDefaults {
        transaction_type: TransactionType::Expense,
        amount: None,
        date: today,
        description: None,
        category: None,
        autofocus_amount: true,
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(create_transaction_route)
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Novo lançamento" }

                (form_fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Salvar lançamento"
                }
            }
        }
    };

    base("Novo lançamento", &[currency_input_styles()], &content)
}

/// The state needed for create new transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the page for creating a transaction.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    let today = get_local_today(&state.local_timezone)?;

    Ok(create_transaction_view(today).into_response())
}

#[cfg(test)]
mod view_tests {
    use axum::extract::State;
    use scraper::{ElementRef, Selector};
    use time::OffsetDateTime;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_input_with_value,
            assert_form_submit_button, assert_hx_endpoint, assert_status_ok, assert_valid_html,
            must_get_form, parse_html_document,
        },
        transaction::create_page::{CreateTransactionPageState, get_create_transaction_page},
    };

    #[tokio::test]
    async fn new_transaction_returns_form() {
        let state = CreateTransactionPageState {
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_create_transaction_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "description", "text");
        assert_form_input_with_value(
            &form,
            "date",
            "date",
            &OffsetDateTime::now_utc().date().to_string(),
        );
        assert_form_submit_button(&form);
        assert_expense_checked(&form);
        assert_amount_step(&form);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let state = CreateTransactionPageState {
            local_timezone: "Not/AZone".to_owned(),
        };

        let result = get_create_transaction_page(State(state)).await;

        assert!(result.is_err());
    }

    #[track_caller]
    fn assert_expense_checked(form: &ElementRef) {
        let selector = Selector::parse("input[name=type_][checked]").unwrap();
        let checked = form
            .select(&selector)
            .next()
            .and_then(|input| input.value().attr("value"));

        assert_eq!(checked, Some("expense"));
    }

    #[track_caller]
    fn assert_amount_step(form: &ElementRef) {
        let selector = Selector::parse("input[name=amount]").unwrap();
        let step = form
            .select(&selector)
            .next()
            .and_then(|input| input.value().attr("step"))
            .expect("amount input should have the attribute 'step'");
        let step: f64 = step
            .parse()
            .expect("the attribute 'step' for the amount input should be a float");
        assert_eq!(
            0.01, step,
            "the amount for a new transaction should increment in steps of 0.01, but got {step}"
        );
    }
}
