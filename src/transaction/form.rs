use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    category::{Category, parse_category_for},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::{Transaction, TransactionBuilder, TransactionType},
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is income or an expense.
    pub type_: TransactionType,
    /// The value of the transaction in reais.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Text detailing the transaction.
    pub description: String,
    /// The label of the category.
    pub category: String,
}

impl TransactionForm {
    /// Convert the form into a builder, checking that the category fits the type.
    pub fn into_builder(self) -> Result<TransactionBuilder, Error> {
        let category = parse_category_for(&self.category, self.type_)?;

        Ok(
            Transaction::build(self.type_, self.amount, self.date, &self.description)
                .category(category),
        )
    }
}

pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub category: Option<Category>,
    pub autofocus_amount: bool,
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);
    let amount_str = defaults.amount.map(|amount| format!("{:.2}", amount.abs()));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Tipo" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-expense"
                        type="radio"
                        value=(TransactionType::Expense.form_value())
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        (TransactionType::Expense.label())
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-income"
                        type="radio"
                        value=(TransactionType::Income.form_value())
                        checked[!is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        (TransactionType::Income.label())
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Valor"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0,00"
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Data"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Descrição"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Ex: Supermercado"
                value=[defaults.description]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Categoria"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for transaction_type in [TransactionType::Expense, TransactionType::Income] {
                    optgroup label=(transaction_type.label())
                    {
                        @for category in Category::for_type(transaction_type) {
                            @let is_selected = defaults.transaction_type == transaction_type
                                && defaults.category == Some(*category);

                            option value=(category.label()) selected[is_selected]
                            {
                                (category.emoji()) " " (category.label())
                            }
                        }
                    }
                }
            }
        }
    }
}
