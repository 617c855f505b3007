//! ECharts configuration for the reports page.
//!
//! Each chart is serialized to JSON with `charming` and initialized by a
//! script that also follows the browser's dark mode preference.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisType, ItemStyle, JsFunction, Tooltip, Trigger},
    series::{Pie, bar},
};
use maud::PreEscaped;

use crate::{
    category::Category,
    html::HeadElement,
    reports::{aggregation::IncomeVsExpense, filter::TimeFilter},
};

const INCOME_COLOR: &str = "#22c55e";
const EXPENSE_COLOR: &str = "#ef4444";

/// A chart with the ID of its HTML container and its ECharts configuration.
pub(super) struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Script that initializes each chart in its container once the page has loaded.
pub(super) fn charts_script(charts: &[ReportChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

pub(super) fn expenses_by_category_chart(totals: &[(Category, f64)]) -> Chart {
    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|(category, total)| (*total, category.label()))
        .collect();

    Chart::new()
        .title(Title::new().text("Despesas por Categoria").left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0"))
        .series(
            Pie::new()
                .name("Despesas")
                .radius(vec!["0%", "60%"])
                .data(data),
        )
}

pub(super) fn income_vs_expense_chart(totals: IncomeVsExpense, time_filter: TimeFilter) -> Chart {
    Chart::new()
        .title(Title::new().text("Receitas vs. Despesas").left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("10%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(vec![format!("Balanço - {}", time_filter.label())]),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Receitas")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .data(vec![totals.income]),
        )
        .series(
            bar::Bar::new()
                .name("Despesas")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .data(vec![totals.expenses]),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[cfg(test)]
mod tests {
    use crate::{
        category::Category,
        html::HeadElement,
        reports::{aggregation::IncomeVsExpense, filter::TimeFilter},
    };

    use super::{ReportChart, charts_script, expenses_by_category_chart, income_vs_expense_chart};

    #[test]
    fn pie_chart_lists_each_category() {
        let chart = expenses_by_category_chart(&[
            (Category::Alimentacao, 80.0),
            (Category::Transporte, 20.0),
        ])
        .to_string();

        assert!(chart.contains("\"pie\""));
        assert!(chart.contains("Alimentação"));
        assert!(chart.contains("Transporte"));
    }

    #[test]
    fn bar_chart_has_income_and_expense_series() {
        let chart = income_vs_expense_chart(
            IncomeVsExpense {
                income: 3000.0,
                expenses: 1200.0,
            },
            TimeFilter::Year,
        )
        .to_string();

        assert!(chart.contains("Receitas"));
        assert!(chart.contains("Despesas"));
        assert!(chart.contains("#22c55e"));
        assert!(chart.contains("#ef4444"));
        assert!(chart.contains("Balanço - Ano"));
    }

    #[test]
    fn script_initializes_every_chart() {
        let script = charts_script(&[
            ReportChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            ReportChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ]);

        let HeadElement::ScriptSource(source) = script else {
            panic!("want a script source");
        };
        assert!(source.0.contains("document.getElementById(\"first-chart\")"));
        assert!(source.0.contains("document.getElementById(\"second-chart\")"));
    }
}
