//! Core fixed expense domain types.

use serde::Deserialize;
use time::Month;

use crate::{Error, auth::UserID, month::parse_month_name};

/// Database identifier for a fixed expense.
pub type FixedExpenseId = i64;

/// An expense that is paid every month, e.g. rent, filed under the month it
/// is planned for.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedExpense {
    pub id: FixedExpenseId,
    pub user_id: UserID,
    pub description: String,
    pub amount: f64,
    pub month: Month,
}

impl FixedExpense {
    /// Start building a fixed expense.
    pub fn build(description: &str, amount: f64, month: Month) -> FixedExpenseBuilder {
        FixedExpenseBuilder {
            description: description.to_owned(),
            amount,
            month,
        }
    }
}

/// The fields of a fixed expense that a user can set.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedExpenseBuilder {
    pub description: String,
    pub amount: f64,
    pub month: Month,
}

impl FixedExpenseBuilder {
    /// Check the fields and trim the description.
    ///
    /// # Errors
    /// Returns [Error::EmptyDescription] or [Error::NonPositiveAmount].
    pub fn validate(mut self) -> Result<Self, Error> {
        let description = self.description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        self.description = description.to_owned();

        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        Ok(self)
    }
}

/// Form data for fixed expense creation and editing.
#[derive(Debug, Deserialize)]
pub struct FixedExpenseFormData {
    pub description: String,
    pub amount: f64,
    /// The Portuguese name of the month, e.g. "Março".
    pub month: String,
}

impl FixedExpenseFormData {
    /// Convert the form into a builder.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the month is not a month name.
    pub fn into_builder(self) -> Result<FixedExpenseBuilder, Error> {
        let month = parse_month_name(&self.month)?;

        Ok(FixedExpense::build(&self.description, self.amount, month))
    }
}

/// The sum of the amounts of `expenses`.
pub fn month_total(expenses: &[FixedExpense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::{Error, auth::UserID};

    use super::{FixedExpense, FixedExpenseFormData, month_total};

    #[test]
    fn validate_rejects_blank_description() {
        let builder = FixedExpense::build("  ", 100.0, Month::March);

        assert_eq!(builder.validate(), Err(Error::EmptyDescription));
    }

    #[test]
    fn validate_rejects_non_positive_amount() {
        let builder = FixedExpense::build("Aluguel", -5.0, Month::March);

        assert_eq!(builder.validate(), Err(Error::NonPositiveAmount(-5.0)));
    }

    #[test]
    fn form_parses_portuguese_month() {
        let form = FixedExpenseFormData {
            description: "Internet".to_owned(),
            amount: 99.9,
            month: "março".to_owned(),
        };

        let builder = form.into_builder().unwrap();

        assert_eq!(builder.month, Month::March);
    }

    #[test]
    fn form_rejects_unknown_month() {
        let form = FixedExpenseFormData {
            description: "Internet".to_owned(),
            amount: 99.9,
            month: "March".to_owned(),
        };

        assert_eq!(
            form.into_builder(),
            Err(Error::InvalidMonth("March".to_owned()))
        );
    }

    #[test]
    fn month_total_sums_amounts() {
        let expense = |id, amount| FixedExpense {
            id,
            user_id: UserID::new(1),
            description: "Foo".to_owned(),
            amount,
            month: Month::January,
        };

        assert_eq!(month_total(&[]), 0.0);
        assert_eq!(month_total(&[expense(1, 1200.0), expense(2, 150.5)]), 1350.5);
    }
}
