//! Totals of income and expenses.

use crate::transaction::{Transaction, TransactionType};

/// The income, expenses and resulting balance of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Add up the income and expenses of `transactions`.
///
/// Both totals are positive numbers and `balance = income - expenses`.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let (income, expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                match transaction.transaction_type {
                    TransactionType::Income => (income + transaction.amount, expenses),
                    TransactionType::Expense => (income, expenses + transaction.amount),
                }
            });

    Summary {
        income,
        expenses,
        balance: income - expenses,
    }
}
