//! Alert messages for reporting the outcome of htmx requests.
//!
//! Alerts are rendered as small fragments that htmx places in the
//! `#alert-container` element of the base layout.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// A success or error message to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message without details.
    SuccessSimple { message: String },
    /// An error message with extra details.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (is_error, message, details) = match self {
            Alert::SuccessSimple { message } => (false, message, None),
            Alert::Error { message, details } => (true, message, Some(details)),
        };

        let container_style = if is_error {
            "flex items-start gap-3 p-4 mb-4 text-red-800 border border-red-300 \
            rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start gap-3 p-4 mb-4 text-green-800 border border-green-300 \
            rounded-lg bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        html! {
            div
                hx-swap-oob="innerHTML:#alert-container"
            {
                div
                    role="alert"
                    class=(container_style)
                {
                    div class="flex-1"
                    {
                        p class="font-semibold" { (message) }

                        @if let Some(details) = details.filter(|details| !details.is_empty()) {
                            p class="text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Fechar"
                        class="ms-auto text-lg leading-none"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, Html(self.into_html().into_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_fragment};

    use super::Alert;

    #[tokio::test]
    async fn error_alert_renders_message_then_details() {
        let alert = Alert::Error {
            message: "Algo deu errado".to_owned(),
            details: "Tente novamente.".to_owned(),
        };

        let response = alert.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let paragraphs = html
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(paragraphs, ["Algo deu errado", "Tente novamente."]);
    }

    #[tokio::test]
    async fn simple_alert_has_no_details() {
        let response = Alert::SuccessSimple {
            message: "Excluído".to_owned(),
        }
        .into_response();

        let html = parse_html_fragment(response).await;
        let paragraphs = html.select(&Selector::parse("p").unwrap()).count();
        assert_eq!(paragraphs, 1);
    }
}
