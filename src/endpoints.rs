//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for listing and adding the fixed expenses of a month.
pub const FIXED_EXPENSES_VIEW: &str = "/fixed-expenses";
/// The page for editing an existing fixed expense.
pub const EDIT_FIXED_EXPENSE_VIEW: &str = "/fixed-expenses/{fixed_expense_id}/edit";
/// The page for listing and adding wishlist items.
pub const WISHLIST_VIEW: &str = "/wishlist";
/// The page for editing an existing wishlist item.
pub const EDIT_WISHLIST_ITEM_VIEW: &str = "/wishlist/{item_id}/edit";
/// The page with charts of income and expenses.
pub const REPORTS_VIEW: &str = "/reports";
/// The page with a month calendar of all transactions.
pub const CALENDAR_VIEW: &str = "/calendar";
/// The page for changing the user's name, password and plan.
pub const SETTINGS_VIEW: &str = "/settings";
/// The savings minicourse.
pub const COURSE_VIEW: &str = "/course";
/// The calculator page.
pub const CALCULATOR_VIEW: &str = "/calculator";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to access users.
pub const USERS: &str = "/api/users";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create fixed expenses.
pub const FIXED_EXPENSES_API: &str = "/api/fixed-expenses";
/// The route to update or delete a single fixed expense.
pub const FIXED_EXPENSE: &str = "/api/fixed-expenses/{fixed_expense_id}";
/// The route to create wishlist items.
pub const WISHLIST_API: &str = "/api/wishlist";
/// The route to update or delete a single wishlist item.
pub const WISHLIST_ITEM: &str = "/api/wishlist/{item_id}";
/// The route to flip the purchased flag of a wishlist item.
pub const TOGGLE_WISHLIST_ITEM: &str = "/api/wishlist/{item_id}/purchased";
/// The route to change the user's display name.
pub const PROFILE_NAME: &str = "/api/settings/name";
/// The route to change the user's password.
pub const PASSWORD: &str = "/api/settings/password";
/// The route to upgrade the user's plan.
pub const UPGRADE_PLAN: &str = "/api/settings/plan";
/// The route to evaluate a calculator expression.
pub const CALCULATE: &str = "/api/calculator";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
