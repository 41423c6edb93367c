use chrono::NaiveDate;
use tally_core::{AmountFormat, JournalEntry, Money, Posting};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum JournalError {
    #[error("line {line}: invalid date '{text}'")]
    InvalidDate { line: usize, text: String },
    #[error("line {line}: posting outside of an entry")]
    UnexpectedPosting { line: usize },
    #[error("line {line}: invalid amount '{text}'")]
    InvalidAmount { line: usize, text: String },
    #[error("line {line}: more than one posting without an amount")]
    AmbiguousPostings { line: usize },
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y.%m.%d"];
const COMMENT_CHARS: &[char] = &[';', '#', '%', '|', '*'];

struct BuildingEntry {
    line: usize,
    date: NaiveDate,
    description: String,
    postings: Vec<(String, Option<String>)>,
}

enum State {
    Idle,
    InEntry(BuildingEntry),
    /// Inside a directive block (`account`, `commodity`, ...); indented lines belong to it.
    InDirective,
}

/// Parses ledger-style journal text into entries.
///
/// A posting written without an amount receives the negated sum of the others,
/// rendered with `format`. Every other amount is kept exactly as written.
pub fn parse_journal(text: &str, format: &AmountFormat) -> Result<Vec<JournalEntry>, JournalError> {
    let mut entries = Vec::new();
    let mut state = State::Idle;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches(['\r', '\n']);

        if line.trim().is_empty() {
            if let State::InEntry(entry) = std::mem::replace(&mut state, State::Idle) {
                entries.push(finish(entry, format)?);
            }
            state = State::Idle;
            continue;
        }

        let indented = line.starts_with([' ', '\t']);
        if !indented {
            if let State::InEntry(entry) = std::mem::replace(&mut state, State::Idle) {
                entries.push(finish(entry, format)?);
            }
            if line.starts_with(COMMENT_CHARS) {
                continue;
            }
            if !line.starts_with(|c: char| c.is_ascii_digit()) {
                state = State::InDirective;
                continue;
            }
            state = State::InEntry(parse_header(line, line_no)?);
            continue;
        }

        let body = line.trim();
        if body.starts_with([';', '#']) {
            continue;
        }
        match &mut state {
            State::InEntry(entry) => entry.postings.push(parse_posting(body)),
            State::InDirective => {}
            State::Idle => return Err(JournalError::UnexpectedPosting { line: line_no }),
        }
    }

    if let State::InEntry(entry) = state {
        entries.push(finish(entry, format)?);
    }

    Ok(entries)
}

fn parse_header(line: &str, line_no: usize) -> Result<BuildingEntry, JournalError> {
    let (date_text, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));
    // Ledger allows `actual=effective`; the actual date is what the bank saw.
    let date_text = date_text.split('=').next().unwrap_or(date_text);
    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_text, fmt).ok())
        .ok_or_else(|| JournalError::InvalidDate {
            line: line_no,
            text: date_text.to_string(),
        })?;

    let mut description = rest.trim();
    if let Some(stripped) = description.strip_prefix(['*', '!']) {
        description = stripped.trim_start();
    }
    if description.starts_with('(') {
        if let Some(end) = description.find(')') {
            description = description[end + 1..].trim_start();
        }
    }
    let description = strip_comment(description);

    Ok(BuildingEntry {
        line: line_no,
        date,
        description: description.to_string(),
        postings: Vec::new(),
    })
}

fn parse_posting(body: &str) -> (String, Option<String>) {
    let body = strip_comment(body);
    let body = body
        .strip_prefix(['*', '!'])
        .map(str::trim_start)
        .unwrap_or(body);

    let split_at = [body.find('\t'), body.find("  ")]
        .into_iter()
        .flatten()
        .min();
    match split_at {
        Some(pos) => {
            let account = body[..pos].trim().to_string();
            let amount = body[pos..].trim();
            (account, (!amount.is_empty()).then(|| amount.to_string()))
        }
        None => (body.trim().to_string(), None),
    }
}

fn strip_comment(text: &str) -> &str {
    match text.find(';') {
        Some(pos) => text[..pos].trim_end(),
        None => text,
    }
}

fn finish(entry: BuildingEntry, format: &AmountFormat) -> Result<JournalEntry, JournalError> {
    let missing = entry.postings.iter().filter(|(_, a)| a.is_none()).count();
    if missing > 1 {
        return Err(JournalError::AmbiguousPostings { line: entry.line });
    }

    let inferred = if missing == 1 {
        let mut sum = Money::zero();
        for amount in entry.postings.iter().filter_map(|(_, a)| a.as_deref()) {
            sum = sum
                + Money::parse(amount, format.comma_separates_cents).map_err(|_| {
                    JournalError::InvalidAmount {
                        line: entry.line,
                        text: amount.to_string(),
                    }
                })?;
        }
        Some((-sum).pretty(format))
    } else {
        None
    };

    let postings = entry
        .postings
        .into_iter()
        .map(|(account, amount)| Posting {
            account,
            amount: amount.or_else(|| inferred.clone()).unwrap_or_default(),
        })
        .collect();

    Ok(JournalEntry {
        date: entry.date,
        description: entry.description,
        postings,
    })
}
