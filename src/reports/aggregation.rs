//! Totals that feed the report charts.

use std::collections::BTreeMap;

use crate::{
    category::Category,
    transaction::{Transaction, TransactionType},
};

/// Income and expense totals for a period.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncomeVsExpense {
    pub income: f64,
    pub expenses: f64,
}

impl IncomeVsExpense {
    /// Whether there was neither income nor expenses.
    pub fn is_empty(&self) -> bool {
        self.income == 0.0 && self.expenses == 0.0
    }
}

/// Sum the expenses in `transactions` per category.
///
/// Categories without expenses are left out. The result is ordered by category.
pub fn expense_totals_by_category(transactions: &[Transaction]) -> Vec<(Category, f64)> {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();

    for transaction in transactions.iter().filter(|transaction| transaction.is_expense()) {
        *totals.entry(transaction.category).or_default() += transaction.amount;
    }

    totals.into_iter().collect()
}

pub fn income_vs_expense(transactions: &[Transaction]) -> IncomeVsExpense {
    transactions
        .iter()
        .fold(IncomeVsExpense::default(), |mut totals, transaction| {
            match transaction.transaction_type {
                TransactionType::Income => totals.income += transaction.amount,
                TransactionType::Expense => totals.expenses += transaction.amount,
            }

            totals
        })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        auth::UserID,
        category::Category,
        transaction::{Transaction, TransactionType},
    };

    use super::{IncomeVsExpense, expense_totals_by_category, income_vs_expense};

    fn transaction(
        id: i64,
        transaction_type: TransactionType,
        amount: f64,
        category: Category,
    ) -> Transaction {
        Transaction {
            id,
            user_id: UserID::new(1),
            transaction_type,
            description: format!("Transação {id}"),
            amount,
            date: date!(2025 - 10 - 01),
            category,
        }
    }

    #[test]
    fn sums_expenses_per_category() {
        let transactions = [
            transaction(1, TransactionType::Expense, 20.0, Category::Transporte),
            transaction(2, TransactionType::Expense, 50.0, Category::Alimentacao),
            transaction(3, TransactionType::Expense, 30.0, Category::Alimentacao),
            transaction(4, TransactionType::Income, 1000.0, Category::Salario),
        ];

        let totals = expense_totals_by_category(&transactions);

        assert_eq!(
            totals,
            vec![(Category::Alimentacao, 80.0), (Category::Transporte, 20.0)]
        );
    }

    #[test]
    fn no_expenses_gives_no_totals() {
        let transactions = [transaction(1, TransactionType::Income, 10.0, Category::Presente)];

        assert!(expense_totals_by_category(&transactions).is_empty());
    }

    #[test]
    fn totals_income_and_expenses() {
        let transactions = [
            transaction(1, TransactionType::Income, 3000.0, Category::Salario),
            transaction(2, TransactionType::Expense, 120.5, Category::Casa),
            transaction(3, TransactionType::Expense, 79.5, Category::Lazer),
        ];

        assert_eq!(
            income_vs_expense(&transactions),
            IncomeVsExpense {
                income: 3000.0,
                expenses: 200.0
            }
        );
    }

    #[test]
    fn empty_when_nothing_recorded() {
        assert!(income_vs_expense(&[]).is_empty());
        assert!(
            !IncomeVsExpense {
                income: 0.0,
                expenses: 1.0
            }
            .is_empty()
        );
    }
}
