//! Defines the core data models and database queries for transactions.

use std::ops::RangeInclusive;

use rusqlite::{
    Connection, Row, ToSql, params_from_iter,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::Deserialize;
use time::Date;

use crate::{Error, auth::UserID, category::Category};

// ============================================================================
// MODELS
// ============================================================================

/// The database ID of a transaction.
pub type TransactionId = i64;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned, e.g. a salary.
    Income,
    /// Money that was spent.
    #[default]
    Expense,
}

impl TransactionType {
    /// The name shown to users.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "Receita",
            TransactionType::Expense => "Despesa",
        }
    }

    /// The value used in forms and in the database.
    pub fn form_value(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.form_value()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned. Always positive.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The category the transaction is filed under.
    pub category: Category,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability. The category
    /// defaults to [Category::Outros].
    pub fn build(
        transaction_type: TransactionType,
        amount: f64,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            amount,
            date,
            description: description.to_owned(),
            category: Category::Outros,
        }
    }

    /// Whether the transaction is an expense.
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// The amount with the sign implied by the transaction type, negative for
    /// expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// The fields of a transaction that a user can set.
///
/// Used for both creating and updating transactions.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::{category::Category, transaction::{Transaction, TransactionType}};
///
/// let builder = Transaction::build(TransactionType::Expense, 45.99, date!(2025 - 01 - 15), "Padaria")
///     .category(Category::Alimentacao);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// The amount of money, must be greater than zero.
    pub amount: f64,
    /// The date when the transaction occurred. Future dates are allowed.
    pub date: Date,
    /// A human-readable description of the transaction.
    pub description: String,
    /// The category, which must be valid for `transaction_type`.
    pub category: Category,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Check the fields and trim the description.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::EmptyDescription] if the description is empty or just whitespace,
    /// - [Error::NonPositiveAmount] if the amount is zero, negative or not a number,
    /// - [Error::InvalidCategory] if the category cannot be used with the transaction type.
    pub fn validate(mut self) -> Result<Self, Error> {
        let description = self.description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        self.description = description.to_owned();

        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if !self.category.is_valid_for(self.transaction_type) {
            return Err(Error::InvalidCategory(self.category.label().to_owned()));
        }

        Ok(self)
    }
}

/// Selects a subset of a user's transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions in these categories. Empty means all categories.
    pub categories: Vec<Category>,
    /// Only include transactions dated within this range.
    pub date_range: Option<RangeInclusive<Date>>,
    /// The maximum number of transactions to return.
    pub limit: Option<u64>,
    /// The number of transactions to skip.
    pub offset: u64,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction for `user_id` in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - validation error from [TransactionBuilder::validate],
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let builder = builder.validate()?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, type, description, amount, date, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, type, description, amount, date, category",
        )?
        .query_row(
            (
                user_id.as_i64(),
                builder.transaction_type,
                builder.description,
                builder.amount,
                builder.date,
                builder.category,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction `id` belonging to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, type, description, amount, date, category FROM \"transaction\"
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Overwrite the fields of transaction `id` with `builder`.
///
/// # Errors
/// This function will return a:
/// - validation error from [TransactionBuilder::validate],
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    user_id: UserID,
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    let builder = builder.validate()?;

    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET type = ?1, description = ?2, amount = ?3, date = ?4, category = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            builder.transaction_type,
            builder.description,
            builder.amount,
            builder.date,
            builder.category,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction `id` belonging to `user_id`.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if `id` does not refer to a
/// transaction owned by `user_id`.
pub fn delete_transaction(
    user_id: UserID,
    id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the transactions of `user_id` that match `filter`, newest first.
///
/// Transactions on the same date are ordered by ID, highest first.
pub fn get_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, mut params) = build_where_clause(user_id, filter);

    // SQLite treats a negative limit as no limit.
    let limit = filter
        .limit
        .and_then(|limit| i64::try_from(limit).ok())
        .unwrap_or(-1);
    let offset = i64::try_from(filter.offset).unwrap_or(i64::MAX);
    params.push(Box::new(limit));
    params.push(Box::new(offset));

    let query = format!(
        "SELECT id, user_id, type, description, amount, date, category FROM \"transaction\"
         {where_clause}
         ORDER BY date DESC, id DESC
         LIMIT ? OFFSET ?"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params.iter()), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get every transaction of `user_id`, newest first.
pub fn get_all_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    get_transactions(user_id, &TransactionFilter::default(), connection)
}

/// Get the `count` most recent transactions of `user_id`.
pub fn recent_transactions(
    user_id: UserID,
    count: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    get_transactions(
        user_id,
        &TransactionFilter {
            limit: Some(count),
            ..Default::default()
        },
        connection,
    )
}

/// Count the transactions of `user_id` in `categories`, or all of them when
/// `categories` is empty.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(
    user_id: UserID,
    categories: &[Category],
    connection: &Connection,
) -> Result<u64, Error> {
    let filter = TransactionFilter {
        categories: categories.to_vec(),
        ..Default::default()
    };
    let (where_clause, params) = build_where_clause(user_id, &filter);

    connection
        .query_row(
            &format!("SELECT COUNT(id) FROM \"transaction\" {where_clause}"),
            params_from_iter(params.iter()),
            |row| row.get::<_, u32>(0),
        )
        .map(u64::from)
        .map_err(|error| error.into())
}

fn build_where_clause(
    user_id: UserID,
    filter: &TransactionFilter,
) -> (String, Vec<Box<dyn ToSql>>) {
    let mut conditions = vec!["user_id = ?".to_owned()];
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(user_id.as_i64())];

    if !filter.categories.is_empty() {
        let placeholders = vec!["?"; filter.categories.len()].join(", ");
        conditions.push(format!("category IN ({placeholders})"));

        for category in &filter.categories {
            params.push(Box::new(*category));
        }
    }

    if let Some(date_range) = &filter.date_range {
        conditions.push("date BETWEEN ? AND ?".to_owned());
        params.push(Box::new(*date_range.start()));
        params.push(Box::new(*date_range.end()));
    }

    (format!("WHERE {}", conditions.join(" AND ")), params)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            type TEXT NOT NULL,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let transaction_type = row.get(2)?;
    let description = row.get(3)?;
    let amount = row.get(4)?;
    let date = row.get(5)?;
    let category = row.get(6)?;

    Ok(Transaction {
        id,
        user_id,
        transaction_type,
        description,
        amount,
        date,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod builder_tests {
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        transaction::{Transaction, TransactionType},
    };

    #[test]
    fn validate_trims_description() {
        let builder = Transaction::build(
            TransactionType::Expense,
            10.0,
            date!(2025 - 10 - 05),
            "  Padaria \n",
        );

        let got = builder.validate().unwrap();

        assert_eq!(got.description, "Padaria");
    }

    #[test]
    fn validate_rejects_empty_description() {
        let builder = Transaction::build(TransactionType::Expense, 10.0, date!(2025 - 10 - 05), " ");

        assert_eq!(builder.validate(), Err(Error::EmptyDescription));
    }

    #[test]
    fn validate_rejects_non_positive_amounts() {
        for amount in [0.0, -1.0, f64::NAN] {
            let builder =
                Transaction::build(TransactionType::Income, amount, date!(2025 - 10 - 05), "Foo");

            assert!(
                matches!(builder.validate(), Err(Error::NonPositiveAmount(_))),
                "want amount {amount} to be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_category_of_other_type() {
        let builder = Transaction::build(TransactionType::Income, 10.0, date!(2025 - 10 - 05), "Foo")
            .category(Category::Supermercado);

        assert_eq!(
            builder.validate(),
            Err(Error::InvalidCategory("Supermercado".to_owned()))
        );
    }

    #[test]
    fn outros_is_valid_for_both_types() {
        for transaction_type in [TransactionType::Income, TransactionType::Expense] {
            let builder = Transaction::build(transaction_type, 10.0, date!(2025 - 10 - 05), "Foo")
                .category(Category::Outros);

            assert!(builder.validate().is_ok());
        }
    }
}
