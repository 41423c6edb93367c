use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tally_core::{AmountFormat, Money, Transaction};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvColumnMapping {
    pub date_column: Option<usize>,
    pub description_columns: Vec<usize>,
    pub amount_column: Option<usize>,
    pub debit_column: Option<usize>,
    pub credit_column: Option<usize>,
    pub date_format: String,
}

impl Default for CsvColumnMapping {
    fn default() -> Self {
        Self {
            date_column: Some(0),
            description_columns: vec![1],
            amount_column: Some(2),
            debit_column: None,
            credit_column: None,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvImportProfile {
    pub name: String,
    pub mapping: CsvColumnMapping,
    pub has_header: bool,
    pub delimiter: String,
    /// Flip every amount's sign, for banks that report spending as positive.
    pub invert: bool,
    pub comma_separates_cents: bool,
}

impl Default for CsvImportProfile {
    fn default() -> Self {
        Self {
            name: "Unnamed Profile".to_string(),
            mapping: CsvColumnMapping::default(),
            has_header: true,
            delimiter: ",".to_string(),
            invert: false,
            comma_separates_cents: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Invalid date format: {0}")]
    InvalidDate(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("No data rows")]
    NoDataRows,
}

fn parse_records<R: Read>(
    reader: &mut csv::Reader<R>,
    profile: &CsvImportProfile,
    format: &AmountFormat,
) -> Result<Vec<Transaction>, CsvError> {
    let mut transactions = Vec::new();
    let mapping = &profile.mapping;

    for result in reader.records() {
        let record = result?;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let date = match mapping.date_column {
            Some(col) => {
                let field = record
                    .get(col)
                    .ok_or_else(|| CsvError::MissingColumn(format!("date_column {col}")))?;
                parse_date(field, &mapping.date_format)?
            }
            None => return Err(CsvError::MissingColumn("date_column".to_string())),
        };

        let description = mapping
            .description_columns
            .iter()
            .filter_map(|&col| record.get(col))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; ");

        let amount = if let Some(col) = mapping.amount_column {
            let field = record
                .get(col)
                .ok_or_else(|| CsvError::MissingColumn(format!("amount_column {col}")))?;
            parse_amount(field, profile.comma_separates_cents)?
        } else if let (Some(d_col), Some(c_col)) = (mapping.debit_column, mapping.credit_column)
        {
            let debit = optional_amount(record.get(d_col), profile.comma_separates_cents)?;
            let credit = optional_amount(record.get(c_col), profile.comma_separates_cents)?;
            // Debits leave the account, credits arrive.
            credit.unwrap_or_else(Money::zero) - debit.unwrap_or_else(Money::zero)
        } else {
            return Err(CsvError::MissingColumn("amount_column".to_string()));
        };

        let amount = if profile.invert { -amount } else { amount };
        transactions.push(Transaction::new(date, amount, &description, format));
    }

    if transactions.is_empty() {
        return Err(CsvError::NoDataRows);
    }

    Ok(transactions)
}

fn optional_amount(field: Option<&str>, comma_separates_cents: bool) -> Result<Option<Money>, CsvError> {
    field
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_amount(s, comma_separates_cents))
        .transpose()
}

fn parse_date(s: &str, format: &str) -> Result<NaiveDate, CsvError> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, format) {
        return Ok(date);
    }

    for fmt in &[
        "%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y", "%d.%m.%Y",
    ] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(CsvError::InvalidDate(s.to_string()))
}

fn parse_amount(s: &str, comma_separates_cents: bool) -> Result<Money, CsvError> {
    Money::parse(s, comma_separates_cents).map_err(|_| CsvError::InvalidAmount(s.trim().to_string()))
}

pub fn import_csv<R: Read>(
    data: R,
    profile: &CsvImportProfile,
    format: &AmountFormat,
) -> Result<Vec<Transaction>, CsvError> {
    let delimiter = profile
        .delimiter
        .as_bytes()
        .first()
        .copied()
        .unwrap_or(b',');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(profile.has_header)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    parse_records(&mut reader, profile, format)
}
