//! The fixed set of categories that transactions and wishlist items are filed under.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::{Error, transaction::TransactionType};

/// A category for a transaction.
///
/// Categories are stored and submitted in forms by their label, e.g. "Alimentação".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Alimentacao,
    Assinatura,
    Cabeleireiro,
    Cachorro,
    Casa,
    Compras,
    Educacao,
    Lazer,
    OperacaoBancaria,
    Pix,
    Saude,
    Servicos,
    Supermercado,
    Transporte,
    Viagem,
    Salario,
    Investimentos,
    Presente,
    RendaExtra,
    Outros,
}

const EXPENSE_CATEGORIES: [Category; 16] = [
    Category::Alimentacao,
    Category::Assinatura,
    Category::Cabeleireiro,
    Category::Cachorro,
    Category::Casa,
    Category::Compras,
    Category::Educacao,
    Category::Lazer,
    Category::OperacaoBancaria,
    Category::Pix,
    Category::Saude,
    Category::Servicos,
    Category::Supermercado,
    Category::Transporte,
    Category::Viagem,
    Category::Outros,
];

const INCOME_CATEGORIES: [Category; 5] = [
    Category::Salario,
    Category::Investimentos,
    Category::Presente,
    Category::RendaExtra,
    Category::Outros,
];

// Expense categories followed by the income categories, without repeating "Outros".
const ALL_CATEGORIES: [Category; 20] = [
    Category::Alimentacao,
    Category::Assinatura,
    Category::Cabeleireiro,
    Category::Cachorro,
    Category::Casa,
    Category::Compras,
    Category::Educacao,
    Category::Lazer,
    Category::OperacaoBancaria,
    Category::Pix,
    Category::Saude,
    Category::Servicos,
    Category::Supermercado,
    Category::Transporte,
    Category::Viagem,
    Category::Outros,
    Category::Salario,
    Category::Investimentos,
    Category::Presente,
    Category::RendaExtra,
];

impl Category {
    /// The categories that can be used with expenses.
    pub fn expense_categories() -> &'static [Category] {
        &EXPENSE_CATEGORIES
    }

    /// The categories that can be used with income.
    pub fn income_categories() -> &'static [Category] {
        &INCOME_CATEGORIES
    }

    /// Every category, each listed once.
    pub fn all() -> &'static [Category] {
        &ALL_CATEGORIES
    }

    /// The categories that can be used with `transaction_type`.
    pub fn for_type(transaction_type: TransactionType) -> &'static [Category] {
        match transaction_type {
            TransactionType::Income => Self::income_categories(),
            TransactionType::Expense => Self::expense_categories(),
        }
    }

    /// Whether this category can be used with `transaction_type`.
    pub fn is_valid_for(self, transaction_type: TransactionType) -> bool {
        Self::for_type(transaction_type).contains(&self)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Alimentacao => "Alimentação",
            Category::Assinatura => "Assinatura",
            Category::Cabeleireiro => "Cabeleireiro",
            Category::Cachorro => "Cachorro",
            Category::Casa => "Casa",
            Category::Compras => "Compras",
            Category::Educacao => "Educação",
            Category::Lazer => "Lazer",
            Category::OperacaoBancaria => "Operação bancária",
            Category::Pix => "Pix",
            Category::Saude => "Saúde",
            Category::Servicos => "Serviços",
            Category::Supermercado => "Supermercado",
            Category::Transporte => "Transporte",
            Category::Viagem => "Viagem",
            Category::Salario => "Salário",
            Category::Investimentos => "Investimentos",
            Category::Presente => "Presente",
            Category::RendaExtra => "Renda Extra",
            Category::Outros => "Outros",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Category::Alimentacao => "🍴",
            Category::Assinatura => "💵",
            Category::Cabeleireiro => "💇",
            Category::Cachorro => "🐾",
            Category::Casa => "🏠",
            Category::Compras => "🛒",
            Category::Educacao => "📖",
            Category::Lazer => "💃",
            Category::OperacaoBancaria => "🏦",
            Category::Pix => "💸",
            Category::Saude => "🏥",
            Category::Servicos => "📄",
            Category::Supermercado => "🛒",
            Category::Transporte => "🚗",
            Category::Viagem => "✈️",
            Category::Salario => "💰",
            Category::Investimentos => "📈",
            Category::Presente => "🎁",
            Category::RendaExtra => "🤑",
            Category::Outros => "...",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();

        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|category| category.label() == label)
            .ok_or_else(|| Error::InvalidCategory(label.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}

/// Parse `label` and check that it can be used with `transaction_type`.
///
/// # Errors
/// Returns [Error::InvalidCategory] if the label is unknown or belongs to the
/// other transaction type.
pub fn parse_category_for(label: &str, transaction_type: TransactionType) -> Result<Category, Error> {
    let category: Category = label.parse()?;

    if !category.is_valid_for(transaction_type) {
        return Err(Error::InvalidCategory(label.to_owned()));
    }

    Ok(category)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{Error, transaction::TransactionType};

    use super::{Category, parse_category_for};

    #[test]
    fn all_categories_are_unique_by_label() {
        let labels: HashSet<&str> = Category::all().iter().map(|c| c.label()).collect();

        assert_eq!(labels.len(), Category::all().len());
        assert_eq!(
            Category::all().len(),
            Category::expense_categories().len() + Category::income_categories().len() - 1
        );
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for category in Category::all() {
            assert_eq!(category.label().parse::<Category>(), Ok(*category));
        }
    }

    #[test]
    fn unknown_label_is_an_error() {
        assert_eq!(
            "Cassino".parse::<Category>(),
            Err(Error::InvalidCategory("Cassino".to_owned()))
        );
    }

    #[test]
    fn outros_is_valid_for_both_types() {
        assert!(Category::Outros.is_valid_for(TransactionType::Income));
        assert!(Category::Outros.is_valid_for(TransactionType::Expense));
    }

    #[test]
    fn salary_is_not_an_expense() {
        assert!(Category::Salario.is_valid_for(TransactionType::Income));
        assert_eq!(
            parse_category_for("Salário", TransactionType::Expense),
            Err(Error::InvalidCategory("Salário".to_owned()))
        );
    }

    #[test]
    fn expense_category_parses_for_expense() {
        assert_eq!(
            parse_category_for("Supermercado", TransactionType::Expense),
            Ok(Category::Supermercado)
        );
    }
}
