//! Code for creating the user table and fetching and updating users in the database.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The subscription plan of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plan {
    /// The plan every new user starts on.
    #[default]
    Free,
    /// The paid plan.
    Pro,
}

impl Plan {
    /// The name of the plan shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Plan::Free => "Gratuito",
            Plan::Pro => "Pro",
        }
    }
}

impl ToSql for Plan {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for Plan {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "Gratuito" => Ok(Plan::Free),
            "Pro" => Ok(Plan::Pro),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The user's email address, trimmed and in lower case.
    pub email: String,
    /// The name the user chose, may be empty.
    pub name: String,
    /// The user's subscription plan.
    pub plan: Plan,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

impl User {
    /// The name to greet the user with.
    ///
    /// Falls back to the part of the email before the '@' when the user has
    /// not set a name.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();

        if !name.is_empty() {
            return name;
        }

        self.email
            .split_once('@')
            .map(|(local_part, _)| local_part)
            .unwrap_or(&self.email)
    }
}

/// Trim and lower-case `email`, checking that it looks like an email address.
///
/// # Errors
///
/// Returns [Error::InvalidEmail] if there is not exactly one '@' with text on
/// both sides, or if the address contains whitespace.
pub fn normalize_email(email: &str) -> Result<String, Error> {
    let email = email.trim().to_lowercase();

    let is_plausible = match email.split_once('@') {
        Some((local_part, domain)) => {
            !local_part.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !is_plausible {
        return Err(Error::InvalidEmail(email));
    }

    Ok(email)
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL DEFAULT '',
                plan TEXT NOT NULL DEFAULT 'Gratuito',
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// The user starts on the free plan.
///
/// # Errors
///
/// Returns:
/// - [Error::InvalidEmail] if `email` is not a plausible email address.
/// - [Error::DuplicateEmail] if a user already has the email address.
/// - [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    email: &str,
    name: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let email = normalize_email(email)?;
    let name = name.trim().to_owned();

    connection.execute(
        "INSERT INTO user (email, name, plan, password) VALUES (?1, ?2, ?3, ?4)",
        (&email, &name, Plan::Free, password_hash.as_ref()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email,
        name,
        plan: Plan::Free,
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, db_connection: &Connection) -> Result<User, Error> {
    db_connection
        .prepare("SELECT id, email, name, plan, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user with the email address `email`.
///
/// The email is normalized the same way as when the user was created.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has the email address.
pub fn get_user_by_email(email: &str, db_connection: &Connection) -> Result<User, Error> {
    let email = email.trim().to_lowercase();

    db_connection
        .prepare("SELECT id, email, name, plan, password FROM user WHERE email = :email")?
        .query_row(&[(":email", &email)], map_user_row)
        .map_err(|error| error.into())
}

/// Set the display name of the user. The name is trimmed and may be empty.
///
/// # Errors
///
/// Returns [Error::UpdateMissingUser] if the user does not exist.
pub fn update_name(user_id: UserID, name: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1 WHERE id = ?2",
        (name.trim(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingUser);
    }

    Ok(())
}

/// Replace the password hash of the user.
///
/// # Errors
///
/// Returns [Error::UpdateMissingUser] if the user does not exist.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingUser);
    }

    Ok(())
}

/// Change the subscription plan of the user.
///
/// # Errors
///
/// Returns [Error::UpdateMissingUser] if the user does not exist.
pub fn set_plan(user_id: UserID, plan: Plan, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET plan = ?1 WHERE id = ?2",
        (plan, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingUser);
    }

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let email = row.get(1)?;
    let name = row.get(2)?;
    let plan = row.get(3)?;
    let raw_password_hash: String = row.get(4)?;

    Ok(User {
        id: UserID::new(raw_id),
        email,
        name,
        plan,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{
            PasswordHash, Plan,
            user::{
                UserID, create_user, get_user_by_email, get_user_by_id,
                normalize_email, set_plan, update_name, update_password,
            },
        },
    };

    use super::create_user_table;

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user =
            create_user("ana@exemplo.com", "Ana", password_hash.clone(), &db_connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.password_hash, password_hash);
        assert_eq!(inserted_user.plan, Plan::Free);
    }

    #[test]
    fn insert_user_normalizes_email() {
        let db_connection = get_db_connection();

        let user = create_user(
            "  Ana@Exemplo.COM ",
            "",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        assert_eq!(user.email, "ana@exemplo.com");
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let db_connection = get_db_connection();
        create_user(
            "ana@exemplo.com",
            "",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let result = create_user(
            "ANA@exemplo.com",
            "Outra Ana",
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn rejects_implausible_emails() {
        for email in ["", "ana", "@exemplo.com", "ana@", "ana@@exemplo.com", "a na@x.com"] {
            assert!(
                matches!(normalize_email(email), Err(Error::InvalidEmail(_))),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserID::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "ana@exemplo.com",
            "Ana",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_by_email_ignores_case() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "ana@exemplo.com",
            "Ana",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_email(" ANA@exemplo.com", &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
        assert_eq!(
            get_user_by_email("bia@exemplo.com", &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn display_name_falls_back_to_email_prefix() {
        let db_connection = get_db_connection();
        let user = create_user(
            "bia.souza@exemplo.com",
            "   ",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        assert_eq!(user.display_name(), "bia.souza");
    }

    #[test]
    fn update_name_trims_and_allows_empty() {
        let db_connection = get_db_connection();
        let user = create_user(
            "ana@exemplo.com",
            "Ana",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        update_name(user.id, "  Ana Paula ", &db_connection).unwrap();
        assert_eq!(
            get_user_by_id(user.id, &db_connection).unwrap().name,
            "Ana Paula"
        );

        update_name(user.id, "", &db_connection).unwrap();
        let user = get_user_by_id(user.id, &db_connection).unwrap();
        assert_eq!(user.name, "");
        assert_eq!(user.display_name(), "ana");
    }

    #[test]
    fn updates_fail_for_missing_user() {
        let db_connection = get_db_connection();
        let missing = UserID::new(99);

        assert_eq!(
            update_name(missing, "Ana", &db_connection),
            Err(Error::UpdateMissingUser)
        );
        assert_eq!(
            update_password(missing, &PasswordHash::new_unchecked("x"), &db_connection),
            Err(Error::UpdateMissingUser)
        );
        assert_eq!(
            set_plan(missing, Plan::Pro, &db_connection),
            Err(Error::UpdateMissingUser)
        );
    }

    #[test]
    fn set_plan_is_idempotent() {
        let db_connection = get_db_connection();
        let user = create_user(
            "ana@exemplo.com",
            "Ana",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        set_plan(user.id, Plan::Pro, &db_connection).unwrap();
        set_plan(user.id, Plan::Pro, &db_connection).unwrap();

        assert_eq!(get_user_by_id(user.id, &db_connection).unwrap().plan, Plan::Pro);
    }
}
