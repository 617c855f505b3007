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
    auth::{MIN_PASSWORD_LENGTH, Plan, User, UserID, get_user_by_id},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
};

/// The state needed for the settings page.
#[derive(Debug, Clone)]
pub struct SettingsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the forms for changing the user's name and password, and their plan.
pub async fn get_settings_page(
    State(state): State<SettingsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;

    Ok(settings_view(&user).into_response())
}

fn settings_view(user: &User) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class={"space-y-8 max-w-2xl " (PAGE_CONTAINER_STYLE)}
        {
            h1 class="w-full text-3xl font-bold" { "Configurações" }

            section id="profile" class=(CARD_STYLE)
            {
                h2 class="text-xl font-bold mb-6" { "Informações do Perfil" }
                (name_form(user))
            }

            section id="security" class=(CARD_STYLE)
            {
                h2 class="text-xl font-bold mb-6" { "Segurança" }
                (password_form())
            }

            section id="plan" class=(CARD_STYLE)
            {
                h2 class="text-xl font-bold mb-6" { "Plano" }
                (plan_section(user.plan))
            }
        }
    };

    base("Configurações", &[], &content)
}

fn name_form(user: &User) -> Markup {
    html! {
        form
            hx-post=(endpoints::PROFILE_NAME)
            hx-swap="none"
            hx-indicator="#name-indicator"
            class="space-y-4"
        {
            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "E-mail" }

                input
                    id="email"
                    type="email"
                    value=(user.email)
                    disabled
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Nome" }

                // An empty name falls back to the start of the email address.
                input
                    id="name"
                    type="text"
                    name="name"
                    value=(user.name)
                    placeholder=(user.display_name())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="name-indicator" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" { (loading_spinner()) }
                "Guardar Nome"
            }
        }
    }
}

fn password_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::PASSWORD)
            hx-swap="none"
            hx-indicator="#password-indicator"
            class="space-y-4"
        {
            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Nova Senha" }

                input
                    id="password"
                    type="password"
                    name="password"
                    placeholder="••••••••"
                    minlength=(MIN_PASSWORD_LENGTH)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="confirm-password" class=(FORM_LABEL_STYLE) { "Confirmar Nova Senha" }

                input
                    id="confirm-password"
                    type="password"
                    name="confirm_password"
                    placeholder="••••••••"
                    minlength=(MIN_PASSWORD_LENGTH)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="password-indicator" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" { (loading_spinner()) }
                "Mudar Senha"
            }
        }
    }
}

fn plan_section(plan: Plan) -> Markup {
    html! {
        p id="current-plan" class="mb-4"
        {
            "Plano atual: "
            span class="font-semibold" { (plan.label()) }
        }

        @match plan {
            Plan::Free => {
                p class="text-sm text-gray-600 dark:text-gray-300 mb-4"
                {
                    "O plano Pro remove o limite de transações e desbloqueia todos os relatórios."
                }

                form hx-post=(endpoints::UPGRADE_PLAN) hx-swap="none"
                {
                    button
                        type="submit"
                        class="w-full px-4 py-2 rounded font-semibold text-white \
                            bg-gradient-to-r from-blue-500 to-purple-600 hover:opacity-90"
                    {
                        "Seja Pro"
                    }
                }
            }
            Plan::Pro => {
                p class="text-sm text-green-700 dark:text-green-300" { "Obrigado por ser Pro!" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;
    use scraper::{ElementRef, Html, Selector};

    use crate::{
        auth::{PasswordHash, Plan, UserID, create_user, set_plan},
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_status_ok, assert_valid_html, parse_html_document,
        },
    };

    use super::{SettingsPageState, get_settings_page};

    fn get_state() -> (SettingsPageState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(
            "ana@example.com",
            "Ana",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (
            SettingsPageState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    fn must_get_section_form<'a>(html: &'a Html, section_id: &str) -> ElementRef<'a> {
        html.select(&Selector::parse(&format!("#{section_id} form")).unwrap())
            .next()
            .unwrap_or_else(|| panic!("no form in #{section_id}"))
    }

    #[tokio::test]
    async fn shows_name_form_with_current_name() {
        let (state, user_id) = get_state();

        let response = get_settings_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_section_form(&html, "profile");
        assert_hx_endpoint(&form, endpoints::PROFILE_NAME, "hx-post");
        let name_input = form
            .select(&Selector::parse("input[name=name]").unwrap())
            .next()
            .unwrap();
        assert_eq!(name_input.value().attr("value"), Some("Ana"));
        assert_eq!(name_input.value().attr("required"), None);
        assert_form_submit_button_with_text(&form, "Guardar Nome");
    }

    #[tokio::test]
    async fn shows_password_form() {
        let (state, user_id) = get_state();

        let response = get_settings_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let form = must_get_section_form(&html, "security");
        assert_hx_endpoint(&form, endpoints::PASSWORD, "hx-post");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "confirm_password", "password");
        assert_form_submit_button_with_text(&form, "Mudar Senha");
    }

    #[tokio::test]
    async fn free_plan_offers_upgrade() {
        let (state, user_id) = get_state();

        let response = get_settings_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let form = must_get_section_form(&html, "plan");
        assert_hx_endpoint(&form, endpoints::UPGRADE_PLAN, "hx-post");
        assert_form_submit_button_with_text(&form, "Seja Pro");
    }

    #[tokio::test]
    async fn pro_plan_has_no_upgrade_button() {
        let (state, user_id) = get_state();
        set_plan(user_id, Plan::Pro, &state.db_connection.lock().unwrap()).unwrap();

        let response = get_settings_page(State(state), Extension(user_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert!(
            html.select(&Selector::parse("#plan form").unwrap())
                .next()
                .is_none()
        );
        let current_plan: String = html
            .select(&Selector::parse("#current-plan").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert_eq!(current_plan, "Plano atual: Pro");
    }
}
