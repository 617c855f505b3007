//! The settings page and the endpoints for changing the user's name,
//! password and plan.

mod page;
mod password;
mod plan;
mod profile;

pub use page::get_settings_page;
pub use password::change_password_endpoint;
pub use plan::upgrade_plan_endpoint;
pub use profile::update_name_endpoint;
