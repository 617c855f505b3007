//! The wishlist: things the user plans to buy, with a purchased flag.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
mod toggle;

pub use create::create_wishlist_item_endpoint;
pub use db::{
    create_wishlist_item, create_wishlist_table, delete_wishlist_item, get_wishlist,
    get_wishlist_item, toggle_purchased, update_wishlist_item,
};
pub use delete::delete_wishlist_item_endpoint;
pub use domain::{WishlistItem, WishlistItemBuilder, WishlistItemId, wishlist_total};
pub use edit::{get_edit_wishlist_item_page, update_wishlist_item_endpoint};
pub use list::get_wishlist_page;
pub use toggle::toggle_wishlist_item_endpoint;
