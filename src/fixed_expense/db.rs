//! Database operations for fixed expenses.

use rusqlite::{Connection, Row, types::Type};
use time::Month;

use crate::{
    Error,
    auth::UserID,
    fixed_expense::{FixedExpense, FixedExpenseBuilder, FixedExpenseId},
};

/// Create a fixed expense for `user_id` and return it with its generated ID.
pub fn create_fixed_expense(
    user_id: UserID,
    builder: FixedExpenseBuilder,
    connection: &Connection,
) -> Result<FixedExpense, Error> {
    let builder = builder.validate()?;

    connection.execute(
        "INSERT INTO fixed_expense (user_id, description, amount, month) VALUES (?1, ?2, ?3, ?4);",
        (
            user_id.as_i64(),
            &builder.description,
            builder.amount,
            builder.month as u8,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(FixedExpense {
        id,
        user_id,
        description: builder.description,
        amount: builder.amount,
        month: builder.month,
    })
}

/// Retrieve a single fixed expense of `user_id` by ID.
pub fn get_fixed_expense(
    user_id: UserID,
    id: FixedExpenseId,
    connection: &Connection,
) -> Result<FixedExpense, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, amount, month FROM fixed_expense
             WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the fixed expenses of `user_id` for `month` in the order they were added.
pub fn get_fixed_expenses_for_month(
    user_id: UserID,
    month: Month,
    connection: &Connection,
) -> Result<Vec<FixedExpense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, amount, month FROM fixed_expense
             WHERE user_id = ?1 AND month = ?2
             ORDER BY id ASC;",
        )?
        .query_map((user_id.as_i64(), month as u8), map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Update a fixed expense. Returns an error if it doesn't exist or belongs to another user.
pub fn update_fixed_expense(
    user_id: UserID,
    id: FixedExpenseId,
    builder: FixedExpenseBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    let builder = builder.validate()?;

    let rows_affected = connection.execute(
        "UPDATE fixed_expense SET description = ?1, amount = ?2, month = ?3
         WHERE id = ?4 AND user_id = ?5",
        (
            builder.description,
            builder.amount,
            builder.month as u8,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingFixedExpense);
    }

    Ok(())
}

/// Delete a fixed expense by ID. Returns an error if it doesn't exist or belongs to another user.
pub fn delete_fixed_expense(
    user_id: UserID,
    id: FixedExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM fixed_expense WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingFixedExpense);
    }

    Ok(())
}

/// Initialize the fixed expense table and indexes.
pub fn create_fixed_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS fixed_expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_fixed_expense_user_month ON fixed_expense(user_id, month);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<FixedExpense, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let description = row.get(2)?;
    let amount = row.get(3)?;
    let month_number: u8 = row.get(4)?;
    let month = Month::try_from(month_number)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(error)))?;

    Ok(FixedExpense {
        id,
        user_id,
        description,
        amount,
        month,
    })
}
