pub mod csv;
pub mod journal;
pub mod tokens;

pub use crate::csv::{import_csv, CsvColumnMapping, CsvError, CsvImportProfile};
pub use journal::{parse_journal, JournalError};
pub use tokens::{TokenFormat, TokenNode, TokensError};
