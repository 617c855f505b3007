//! Fixed expenses: amounts that are paid every month, grouped by the month they are planned for.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_fixed_expense_endpoint;
pub use db::{
    create_fixed_expense, create_fixed_expense_table, delete_fixed_expense, get_fixed_expense,
    get_fixed_expenses_for_month, update_fixed_expense,
};
pub use delete::delete_fixed_expense_endpoint;
pub use domain::{FixedExpense, FixedExpenseBuilder, FixedExpenseId, month_total};
pub use edit::{get_edit_fixed_expense_page, update_fixed_expense_endpoint};
pub use list::get_fixed_expenses_page;
