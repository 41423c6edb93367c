use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::{AmountFormat, Money};

/// One normalized statement row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Money,
    pub formatted_amount: String,
    pub formatted_amount_negated: String,
    pub description: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: Money, description: &str, format: &AmountFormat) -> Self {
        Transaction {
            date,
            amount,
            formatted_amount: amount.pretty(format),
            formatted_amount_negated: (-amount).pretty(format),
            description: description.trim().to_string(),
        }
    }

    pub fn formatted_date(&self, date_format: &str) -> String {
        self.date.format(date_format).to_string()
    }
}

/// One account/amount line of a journal entry. The amount is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub account: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub description: String,
    pub postings: Vec<Posting>,
}

/// Renders the two-posting journal entry for an accepted transaction.
///
/// Money flowing in lists the bank posting first; money flowing out lists the
/// counter account first. Every posting separates account and amount with
/// five tabs and the entry ends with a blank line.
pub fn render_entry(
    tx: &Transaction,
    date_format: &str,
    bank_account: &str,
    counter_account: &str,
) -> String {
    let bank_line = format!("\t{bank_account}\t\t\t\t\t{}\n", tx.formatted_amount);
    let counter_line = format!("\t{counter_account}\t\t\t\t\t{}\n", tx.formatted_amount_negated);
    let (first, second) = if tx.amount.is_positive() {
        (bank_line, counter_line)
    } else {
        (counter_line, bank_line)
    };
    format!(
        "{}\t{}\n{first}{second}\n",
        tx.formatted_date(date_format),
        tx.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn tx(amount: &str, desc: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            Money::from_decimal(Decimal::from_str(amount).unwrap()),
            desc,
            &AmountFormat::default(),
        )
    }

    #[test]
    fn formats_both_signs() {
        let t = tx("-12.50", "  Coffee Shop ");
        assert_eq!(t.formatted_amount, "$-12.50");
        assert_eq!(t.formatted_amount_negated, "$12.50");
        assert_eq!(t.description, "Coffee Shop");
    }

    #[test]
    fn render_outflow_puts_counter_account_first() {
        let out = render_entry(
            &tx("-12.50", "Coffee Shop"),
            "%Y-%m-%d",
            "Assets:Bank:Checking",
            "Expenses:Food",
        );
        assert_eq!(
            out,
            "2020-01-01\tCoffee Shop\n\tExpenses:Food\t\t\t\t\t$12.50\n\tAssets:Bank:Checking\t\t\t\t\t$-12.50\n\n"
        );
    }

    #[test]
    fn render_inflow_puts_bank_first() {
        let out = render_entry(
            &tx("1000", "Payroll"),
            "%d/%m/%Y",
            "Assets:Bank:Checking",
            "Income:Salary",
        );
        assert_eq!(
            out,
            "01/01/2020\tPayroll\n\tAssets:Bank:Checking\t\t\t\t\t$1000.00\n\tIncome:Salary\t\t\t\t\t$-1000.00\n\n"
        );
    }
}
