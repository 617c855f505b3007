//! Core wishlist types.

use serde::Deserialize;

use crate::{Error, auth::UserID, category::{Category, parse_category_for}, transaction::TransactionType};

/// Database identifier for a wishlist item.
pub type WishlistItemId = i64;

/// Something the user wants to buy, with its expected price.
#[derive(Debug, Clone, PartialEq)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub user_id: UserID,
    pub description: String,
    pub amount: f64,
    pub purchased: bool,
    pub category: Category,
}

impl WishlistItem {
    /// Start building a wishlist item filed under [Category::Compras].
    pub fn build(description: &str, amount: f64) -> WishlistItemBuilder {
        WishlistItemBuilder {
            description: description.to_owned(),
            amount,
            category: Category::Compras,
        }
    }
}

/// The fields of a wishlist item that a user can set.
///
/// The purchased flag is only changed through [crate::wishlist::toggle_purchased].
#[derive(Debug, Clone, PartialEq)]
pub struct WishlistItemBuilder {
    pub description: String,
    pub amount: f64,
    pub category: Category,
}

impl WishlistItemBuilder {
    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Check the fields and trim the description.
    ///
    /// # Errors
    /// Returns [Error::EmptyDescription], [Error::NonPositiveAmount], or
    /// [Error::InvalidCategory] for an income-only category.
    pub fn validate(mut self) -> Result<Self, Error> {
        let description = self.description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        self.description = description.to_owned();

        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if !self.category.is_valid_for(TransactionType::Expense) {
            return Err(Error::InvalidCategory(self.category.label().to_owned()));
        }

        Ok(self)
    }
}

/// Form data for creating and editing wishlist items.
#[derive(Debug, Deserialize)]
pub struct WishlistItemFormData {
    pub description: String,
    pub amount: f64,
    /// The category label, defaults to "Compras" when missing.
    pub category: Option<String>,
}

impl WishlistItemFormData {
    /// Convert the form into a builder.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if the category is not an expense category.
    pub fn into_builder(self) -> Result<WishlistItemBuilder, Error> {
        let builder = WishlistItem::build(&self.description, self.amount);

        match self.category.as_deref() {
            Some(label) => Ok(builder.category(parse_category_for(label, TransactionType::Expense)?)),
            None => Ok(builder),
        }
    }
}

/// The sum of the amounts of all `items`, purchased or not.
pub fn wishlist_total(items: &[WishlistItem]) -> f64 {
    items.iter().map(|item| item.amount).sum()
}
