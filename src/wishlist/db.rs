//! Database operations for wishlist items.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    wishlist::{WishlistItem, WishlistItemBuilder, WishlistItemId},
};

/// Create a wishlist item for `user_id`. New items are not purchased.
pub fn create_wishlist_item(
    user_id: UserID,
    builder: WishlistItemBuilder,
    connection: &Connection,
) -> Result<WishlistItem, Error> {
    let builder = builder.validate()?;

    connection
        .prepare(
            "INSERT INTO wishlist_item (user_id, description, amount, purchased, category)
             VALUES (?1, ?2, ?3, 0, ?4)
             RETURNING id, user_id, description, amount, purchased, category;",
        )?
        .query_row(
            (
                user_id.as_i64(),
                &builder.description,
                builder.amount,
                builder.category,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single wishlist item of `user_id` by ID.
pub fn get_wishlist_item(
    user_id: UserID,
    id: WishlistItemId,
    connection: &Connection,
) -> Result<WishlistItem, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, amount, purchased, category FROM wishlist_item
             WHERE id = ?1 AND user_id = ?2;",
        )?
        .query_row((id, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Retrieve all wishlist items of `user_id`, oldest first.
pub fn get_wishlist(user_id: UserID, connection: &Connection) -> Result<Vec<WishlistItem>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, amount, purchased, category FROM wishlist_item
             WHERE user_id = ?1
             ORDER BY id ASC;",
        )?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_item| maybe_item.map_err(|error| error.into()))
        .collect()
}

/// Update the description, amount and category of a wishlist item.
pub fn update_wishlist_item(
    user_id: UserID,
    id: WishlistItemId,
    builder: WishlistItemBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    let builder = builder.validate()?;

    let rows_affected = connection.execute(
        "UPDATE wishlist_item SET description = ?1, amount = ?2, category = ?3
         WHERE id = ?4 AND user_id = ?5",
        (
            builder.description,
            builder.amount,
            builder.category,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingWishlistItem);
    }

    Ok(())
}

/// Flip the purchased flag of a wishlist item and return the updated item.
pub fn toggle_purchased(
    user_id: UserID,
    id: WishlistItemId,
    connection: &Connection,
) -> Result<WishlistItem, Error> {
    connection
        .prepare(
            "UPDATE wishlist_item SET purchased = NOT purchased
             WHERE id = ?1 AND user_id = ?2
             RETURNING id, user_id, description, amount, purchased, category;",
        )?
        .query_row((id, user_id.as_i64()), map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingWishlistItem,
            error => error.into(),
        })
}

/// Delete a wishlist item by ID.
pub fn delete_wishlist_item(
    user_id: UserID,
    id: WishlistItemId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM wishlist_item WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingWishlistItem);
    }

    Ok(())
}

/// Initialize the wishlist table.
pub fn create_wishlist_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS wishlist_item (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            purchased INTEGER NOT NULL DEFAULT 0,
            category TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_wishlist_item_user ON wishlist_item(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<WishlistItem, rusqlite::Error> {
    Ok(WishlistItem {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        description: row.get(2)?,
        amount: row.get(3)?,
        purchased: row.get(4)?,
        category: row.get(5)?,
    })
}
