//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    calculator::{calculate_endpoint, get_calculator_page},
    calendar::get_calendar_page,
    course::get_course_page,
    dashboard::get_dashboard_page,
    endpoints,
    fixed_expense::{
        create_fixed_expense_endpoint, delete_fixed_expense_endpoint, get_edit_fixed_expense_page,
        get_fixed_expenses_page, update_fixed_expense_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    reports::get_reports_page,
    settings::{
        change_password_endpoint, get_settings_page, update_name_endpoint, upgrade_plan_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_create_transaction_page, get_edit_transaction_page, get_transactions_page,
    },
    wishlist::{
        create_wishlist_item_endpoint, delete_wishlist_item_endpoint, get_edit_wishlist_item_page,
        get_wishlist_page, toggle_wishlist_item_endpoint, update_wishlist_item_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::FIXED_EXPENSES_VIEW, get(get_fixed_expenses_page))
        .route(
            endpoints::EDIT_FIXED_EXPENSE_VIEW,
            get(get_edit_fixed_expense_page),
        )
        .route(endpoints::WISHLIST_VIEW, get(get_wishlist_page))
        .route(
            endpoints::EDIT_WISHLIST_ITEM_VIEW,
            get(get_edit_wishlist_item_page),
        )
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::CALENDAR_VIEW, get(get_calendar_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .route(endpoints::COURSE_VIEW, get(get_course_page))
        .route(endpoints::CALCULATOR_VIEW, get(get_calculator_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes are requested by htmx and need the HX-Redirect header for auth redirects to work.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(
                endpoints::FIXED_EXPENSES_API,
                post(create_fixed_expense_endpoint),
            )
            .route(
                endpoints::FIXED_EXPENSE,
                put(update_fixed_expense_endpoint)
                    .delete(delete_fixed_expense_endpoint),
            )
            .route(endpoints::WISHLIST_API, post(create_wishlist_item_endpoint))
            .route(
                endpoints::WISHLIST_ITEM,
                put(update_wishlist_item_endpoint)
                    .delete(delete_wishlist_item_endpoint),
            )
            .route(
                endpoints::TOGGLE_WISHLIST_ITEM,
                post(toggle_wishlist_item_endpoint),
            )
            .route(endpoints::PROFILE_NAME, post(update_name_endpoint))
            .route(endpoints::PASSWORD, post(change_password_endpoint))
            .route(endpoints::UPGRADE_PLAN, post(upgrade_plan_endpoint))
            .route(endpoints::CALCULATE, post(calculate_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
