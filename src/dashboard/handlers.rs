//! The dashboard page handler and view.

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
    auth::{User, UserID, get_user_by_id},
    dashboard::{
        cards::{
            insight_banner, level_progress_bar, plan_badge, recent_transactions_card,
            summary_cards,
        },
        level::LevelProgress,
        summary::{Summary, summarize},
    },
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    transaction::{Transaction, get_all_transactions, recent_transactions},
};

/// The number of transactions listed on the dashboard.
const RECENT_TRANSACTION_COUNT: u64 = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the user and their transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Everything shown on the dashboard.
struct DashboardData {
    user: User,
    summary: Summary,
    progress: LevelProgress,
    transaction_count: u64,
    recent: Vec<Transaction>,
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let data = build_dashboard_data(user_id, &connection)?;

    Ok(dashboard_view(&data).into_response())
}

fn build_dashboard_data(user_id: UserID, connection: &Connection) -> Result<DashboardData, Error> {
    let user = get_user_by_id(user_id, connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id:?}: {error}"))?;

    let transactions = get_all_transactions(user_id, connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let recent = recent_transactions(user_id, RECENT_TRANSACTION_COUNT, connection)
        .inspect_err(|error| tracing::error!("could not get recent transactions: {error}"))?;

    let transaction_count = transactions.len() as u64;

    Ok(DashboardData {
        user,
        summary: summarize(&transactions),
        progress: LevelProgress::new(transaction_count),
        transaction_count,
        recent,
    })
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)
        (insight_banner())

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="space-y-8"
            {
                header
                {
                    div class="flex justify-between items-start gap-4"
                    {
                        h1 class="text-3xl font-bold bg-gradient-to-r from-blue-500 to-purple-600 \
                            bg-clip-text text-transparent"
                        {
                            "Olá, " (data.user.display_name()) "!"
                        }

                        (plan_badge(data.user.plan, data.transaction_count))
                    }

                    (level_progress_bar(&data.progress))
                }

                (summary_cards(&data.summary))

                section class="grid grid-cols-1 md:grid-cols-2 gap-6"
                {
                    a
                        href=(endpoints::NEW_TRANSACTION_VIEW)
                        class="flex items-center justify-center gap-3 p-6 text-lg font-semibold \
                            text-white bg-gradient-to-r from-blue-500 to-purple-600 rounded-xl shadow-lg"
                    {
                        "Adicionar Lançamento"
                    }

                    a
                        href=(endpoints::FIXED_EXPENSES_VIEW)
                        class="flex items-center justify-center gap-3 p-6 text-lg font-semibold \
                            text-gray-700 bg-white dark:bg-gray-800 dark:text-gray-200 rounded-xl shadow-lg"
                    {
                        "Gastos Fixos"
                    }
                }

                section class="grid grid-cols-1 md:grid-cols-2 gap-6"
                {
                    div class=(CARD_STYLE)
                    {
                        h3 class="font-bold text-xl mb-2" { "Comece por aqui!" }
                        p class="text-gray-600 dark:text-gray-400"
                        {
                            "Aprenda a poupar e a investir o seu dinheiro com o nosso minicurso financeiro gratuito."
                        }
                        a href=(endpoints::COURSE_VIEW) class={"inline-block mt-3 font-semibold " (LINK_STYLE)}
                        {
                            "Iniciar curso →"
                        }
                    }

                    div class=(CARD_STYLE)
                    {
                        h3 class="font-bold text-xl mb-2" { "Ver Relatórios" }
                        p class="text-gray-600 dark:text-gray-400"
                        {
                            "Analise os seus gastos e receitas com gráficos detalhados."
                        }
                        a href=(endpoints::REPORTS_VIEW) class={"inline-block mt-3 font-semibold " (LINK_STYLE)}
                        {
                            "Abrir relatórios →"
                        }
                    }
                }

                (recent_transactions_card(&data.recent))
            }
        }
    };

    base("Painel Principal", &[], &content)
}
