//! Card components of the dashboard.

use maud::{Markup, PreEscaped, html};

use crate::{
    auth::Plan,
    dashboard::{level::LevelProgress, summary::Summary},
    endpoints::{self, format_endpoint},
    html::{
        CARD_STYLE, EXPENSE_TEXT_STYLE, INCOME_TEXT_STYLE, LINK_STYLE, format_currency,
        format_date, format_signed_currency, truncate_description,
    },
    transaction::Transaction,
};

/// The number of transactions shown in the free plan badge, e.g. "12/30".
const FREE_PLAN_TRANSACTIONS: u64 = 30;

/// The localStorage key that remembers the insight banner was closed.
const INSIGHT_BANNER_STORAGE_KEY: &str = "hideFinancialInsightBanner";

/// Income, expenses and balance cards.
pub(super) fn summary_cards(summary: &Summary) -> Markup {
    let balance_style = if summary.balance < 0.0 {
        EXPENSE_TEXT_STYLE
    } else {
        "text-blue-700 dark:text-blue-300"
    };

    html! {
        section class="grid grid-cols-1 md:grid-cols-3 gap-6"
        {
            (summary_card("Receitas", "income-total", summary.income, INCOME_TEXT_STYLE))
            (summary_card("Despesas", "expenses-total", summary.expenses, EXPENSE_TEXT_STYLE))
            (summary_card("Saldo", "balance-total", summary.balance, balance_style))
        }
    }
}

fn summary_card(title: &str, id: &str, value: f64, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p id=(id) class={"text-2xl font-bold " (value_style)} { (format_currency(value)) }
        }
    }
}

pub(super) fn level_progress_bar(progress: &LevelProgress) -> Markup {
    let width = format!("width: {:.0}%", progress.percent);

    html! {
        div id="level-progress" class="mt-4 max-w-md"
        {
            div class="flex justify-between items-center mb-1"
            {
                span class={"text-sm font-bold " (progress.level.text_style())}
                {
                    "Nível " (progress.level.label())
                }
                span class="text-xs text-gray-500 font-semibold" { (progress.label) }
            }

            div
                class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=(format!("{:.0}", progress.percent))
            {
                div class={"h-2.5 rounded-full " (progress.level.bar_style())} style=(width) {}
            }
        }
    }
}

/// The plan badge. Free users get a button to upgrade.
pub(super) fn plan_badge(plan: Plan, transaction_count: u64) -> Markup {
    html! {
        div id="plan-badge" class="text-sm text-center md:text-right bg-white dark:bg-gray-800 p-3 rounded-lg shadow-md"
        {
            @match plan {
                Plan::Free => {
                    p class="font-semibold text-gray-700 dark:text-gray-200"
                    {
                        "Plano " (plan.label()) " (" (transaction_count) "/" (FREE_PLAN_TRANSACTIONS) ")"
                    }

                    button
                        type="button"
                        hx-post=(endpoints::UPGRADE_PLAN)
                        class="mt-1 text-xs font-bold text-white bg-gradient-to-r \
                            from-blue-500 to-purple-600 px-3 py-1 rounded-full hover:opacity-90"
                    {
                        "Seja Pro"
                    }
                }
                Plan::Pro => {
                    p class="font-semibold text-transparent bg-clip-text bg-gradient-to-r from-blue-500 to-purple-600"
                    {
                        "Plano " (plan.label())
                    }
                }
            }
        }
    }
}

/// A banner with a fun fact, hidden for good once the user closes it.
pub(super) fn insight_banner() -> Markup {
    let script = format!(
        "(function() {{
            const banner = document.getElementById('insight-banner');
            if (localStorage.getItem('{INSIGHT_BANNER_STORAGE_KEY}') !== 'true') {{
                banner.classList.remove('hidden');
            }}
            banner.querySelector('button').addEventListener('click', function() {{
                banner.remove();
                localStorage.setItem('{INSIGHT_BANNER_STORAGE_KEY}', 'true');
            }});
        }})();"
    );

    html! {
        div id="insight-banner" class="hidden w-full flex justify-center p-2"
        {
            div class="bg-gradient-to-r from-blue-500 to-purple-600 text-white p-4 rounded-xl \
                shadow-lg flex items-center justify-between gap-4 w-11/12 max-w-2xl"
            {
                p class="text-sm md:text-base font-medium text-center flex-grow"
                {
                    strong { "Você sabia?" }
                    " Apenas 28% dos brasileiros controlam suas finanças. Você está no caminho certo!"
                }

                button
                    type="button"
                    aria-label="Fechar mensagem"
                    class="text-white hover:bg-white/20 rounded-full p-1"
                {
                    "×"
                }
            }
        }

        script { (PreEscaped(script)) }
    }
}

pub(super) fn recent_transactions_card(transactions: &[Transaction]) -> Markup {
    html! {
        section class=(CARD_STYLE)
        {
            div class="flex justify-between items-center mb-4"
            {
                h2 class="text-xl font-bold" { "Últimos Lançamentos" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Ver todos" }
            }

            @if transactions.is_empty() {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "Nenhum lançamento ainda. "
                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "Adicione o primeiro." }
                }
            } @else {
                ul id="recent-transactions" class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for transaction in transactions {
                        (recent_transaction_item(transaction))
                    }
                }
            }
        }
    }
}

fn recent_transaction_item(transaction: &Transaction) -> Markup {
    let (description, tooltip) = truncate_description(&transaction.description);
    let amount_style = if transaction.is_expense() {
        EXPENSE_TEXT_STYLE
    } else {
        INCOME_TEXT_STYLE
    };
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);

    html! {
        li class="flex items-center justify-between py-3 gap-4"
        {
            div class="flex items-center gap-3"
            {
                span class="text-xl" aria-hidden="true" { (transaction.category.emoji()) }
                div
                {
                    a href=(edit_url) title=[tooltip] class="font-medium hover:underline" { (description) }
                    p class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (format_date(transaction.date)) " · " (transaction.category.label())
                    }
                }
            }

            span class={"font-semibold " (amount_style)}
            {
                (format_signed_currency(transaction.amount, transaction.is_expense()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{auth::Plan, dashboard::level::LevelProgress, endpoints};

    use super::{level_progress_bar, plan_badge};

    #[test]
    fn free_plan_has_upgrade_button() {
        let html = Html::parse_fragment(&plan_badge(Plan::Free, 12).into_string());

        let button = html
            .select(&Selector::parse("button").unwrap())
            .next()
            .expect("no upgrade button");
        assert_eq!(button.value().attr("hx-post"), Some(endpoints::UPGRADE_PLAN));
        assert_eq!(button.text().collect::<String>(), "Seja Pro");

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Plano Gratuito (12/30)"), "got {text:?}");
    }

    #[test]
    fn pro_plan_has_no_upgrade_button() {
        let html = Html::parse_fragment(&plan_badge(Plan::Pro, 12).into_string());

        assert!(html.select(&Selector::parse("button").unwrap()).next().is_none());
    }

    #[test]
    fn progress_bar_width_matches_percent() {
        let html = Html::parse_fragment(&level_progress_bar(&LevelProgress::new(15)).into_string());

        let bar = html
            .select(&Selector::parse("[role=progressbar] > div").unwrap())
            .next()
            .unwrap();
        assert_eq!(bar.value().attr("style"), Some("width: 50%"));

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Nível Prata"));
        assert!(text.contains("5/10 transações"));
    }
}
