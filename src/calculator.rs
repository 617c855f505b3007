//! A four-function calculator for quick sums while recording transactions.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
};

/// An arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// The value submitted by the calculator form.
    fn form_value(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "−",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }
}

/// Errors from evaluating a calculation.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CalculationError {
    #[error("Não é possível dividir por zero.")]
    DivisionByZero,
}

/// Apply `operator` to `a` and `b`.
///
/// # Errors
///
/// Returns [CalculationError::DivisionByZero] when dividing by zero.
pub fn calculate(a: f64, operator: Operator, b: f64) -> Result<f64, CalculationError> {
    match operator {
        Operator::Add => Ok(a + b),
        Operator::Subtract => Ok(a - b),
        Operator::Multiply => Ok(a * b),
        Operator::Divide if b == 0.0 => Err(CalculationError::DivisionByZero),
        Operator::Divide => Ok(a / b),
    }
}

/// Format a result with two decimal places.
fn format_result(value: f64) -> String {
    // Avoid showing "-0.00".
    let value = if value.abs() < 0.005 { 0.0 } else { value };

    format!("{value:.2}")
}

#[derive(Debug, Deserialize)]
pub struct CalculationForm {
    pub a: f64,
    pub operator: Operator,
    pub b: f64,
}

pub async fn get_calculator_page() -> Response {
    let nav_bar = NavBar::new(endpoints::CALCULATOR_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class={"max-w-md " (PAGE_CONTAINER_STYLE)}
        {
            section class=(CARD_STYLE)
            {
                h1 class="text-2xl font-bold mb-6" { "Calculadora" }

                form
                    hx-post=(endpoints::CALCULATE)
                    hx-target="#calculator-result"
                    hx-swap="outerHTML"
                    class="space-y-4"
                {
                    div
                    {
                        label for="a" class=(FORM_LABEL_STYLE) { "Primeiro número" }
                        input id="a" type="number" name="a" step="any" required class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="operator" class=(FORM_LABEL_STYLE) { "Operação" }
                        select id="operator" name="operator" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for operator in Operator::ALL {
                                option value=(operator.form_value()) { (operator.symbol()) }
                            }
                        }
                    }

                    div
                    {
                        label for="b" class=(FORM_LABEL_STYLE) { "Segundo número" }
                        input id="b" type="number" name="b" step="any" required class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "=" }
                }

                (result_view(None))
            }
        }
    };

    base("Calculadora", &[], &content).into_response()
}

/// Evaluate the calculator form and return the result for htmx to swap in.
pub async fn calculate_endpoint(Form(form): Form<CalculationForm>) -> Response {
    match calculate(form.a, form.operator, form.b) {
        Ok(result) => result_view(Some(Ok(result))).into_response(),
        Err(error) => {
            tracing::warn!("rejected calculation {} {:?} {}: {error}", form.a, form.operator, form.b);
            result_view(Some(Err(error))).into_response()
        }
    }
}

fn result_view(result: Option<Result<f64, CalculationError>>) -> Markup {
    html! {
        output id="calculator-result" class="block mt-6 text-3xl font-bold text-right"
        {
            @match result {
                None => { "0.00" }
                Some(Ok(value)) => { (format_result(value)) }
                Some(Err(error)) => {
                    span class="text-base text-red-600 dark:text-red-400" { (error) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::Form;
    use scraper::Selector;

    use crate::test_utils::{
        assert_hx_endpoint, assert_status_ok, assert_valid_html, must_get_form,
        parse_html_document, parse_html_fragment,
    };

    use super::{
        CalculationError, CalculationForm, Operator, calculate, calculate_endpoint,
        format_result, get_calculator_page,
    };

    #[test]
    fn applies_each_operator() {
        assert_eq!(calculate(6.0, Operator::Add, 3.0), Ok(9.0));
        assert_eq!(calculate(6.0, Operator::Subtract, 3.0), Ok(3.0));
        assert_eq!(calculate(6.0, Operator::Multiply, 3.0), Ok(18.0));
        assert_eq!(calculate(6.0, Operator::Divide, 3.0), Ok(2.0));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(
            calculate(1.0, Operator::Divide, 0.0),
            Err(CalculationError::DivisionByZero)
        );
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_result(0.1 + 0.2), "0.30");
        assert_eq!(format_result(-0.0), "0.00");
        assert_eq!(format_result(-12.5), "-12.50");
    }

    #[test]
    fn parses_operator_symbols() {
        let form: CalculationForm = serde_html_form::from_str("a=1.5&operator=%2A&b=2").unwrap();

        assert_eq!(form.operator, Operator::Multiply);
        assert_eq!(form.a, 1.5);
    }

    #[tokio::test]
    async fn page_has_calculator_form() {
        let response = get_calculator_page().await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/calculator", "hx-post");
    }

    #[tokio::test]
    async fn returns_result_fragment() {
        let response = calculate_endpoint(Form(CalculationForm {
            a: 150.0,
            operator: Operator::Multiply,
            b: 12.0,
        }))
        .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let text: String = html
            .select(&Selector::parse("#calculator-result").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert_eq!(text.trim(), "1800.00");
    }

    #[tokio::test]
    async fn shows_message_for_division_by_zero() {
        let response = calculate_endpoint(Form(CalculationForm {
            a: 1.0,
            operator: Operator::Divide,
            b: 0.0,
        }))
        .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let text: String = html.root_element().text().collect();
        assert!(text.contains("Não é possível dividir por zero."));
    }
}
