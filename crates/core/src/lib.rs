pub mod account;
pub mod money;
pub mod transaction;

pub use account::{AccountError, AccountPath, ACCOUNT_SEPARATOR};
pub use money::{AmountFormat, Money, MoneyError};
pub use transaction::{render_entry, JournalEntry, Posting, Transaction};
