//! Unattended statement classification: every row gets its best suggestion
//! and is written to stdout as a journal entry.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tally_classify::Session;
use tally_core::{render_entry, Transaction};
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Suggest ledger accounts for bank statement rows")]
struct Cli {
    /// Bank statement CSV
    statement: PathBuf,

    /// Settings file (session, statement profile, source paths)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Existing journal to learn from and check duplicates against
    #[arg(short, long)]
    ledger: Option<PathBuf>,

    /// Account token file (TOML or JSON)
    #[arg(short = 't', long)]
    account_tokens: Option<PathBuf>,

    /// Account the statement belongs to
    #[arg(short, long)]
    bank_account: Option<String>,

    /// Do not learn from the accounts chosen during this run
    #[arg(long)]
    tokens_only: bool,

    /// Also write rows that look like duplicates
    #[arg(long)]
    keep_duplicates: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load_config(cli.config.as_deref())?;
    if let Some(bank) = cli.bank_account {
        cfg.session.bank_account = bank;
    }
    if cli.tokens_only {
        cfg.session.tokens_only = true;
    }
    let account_tokens = cli.account_tokens.or(cfg.account_tokens);
    let ledger = cli.ledger.or(cfg.ledger);

    let mut session = Session::from_sources(cfg.session, account_tokens.as_deref(), ledger.as_deref())
        .context("learning from account tokens and journal")?;

    let file = File::open(&cli.statement)
        .with_context(|| format!("open {}", cli.statement.display()))?;
    let transactions =
        tally_import::import_csv(file, &cfg.statement, &session.config().amount_format)
            .with_context(|| format!("import {}", cli.statement.display()))?;
    tracing::info!(rows = transactions.len(), "statement imported");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let written = classify_all(&mut session, &transactions, cli.keep_duplicates, &mut out)?;
    out.flush()?;

    tracing::info!(written, skipped = transactions.len() - written, "done");
    Ok(())
}

/// Classifies rows in statement order, learning from each answer before the
/// next row is ranked. Rows with no suggestion get the fallback account and
/// are not learned from. Returns how many entries were written.
fn classify_all<W: Write>(
    session: &mut Session,
    transactions: &[Transaction],
    keep_duplicates: bool,
    out: &mut W,
) -> Result<usize> {
    let mut written = 0;
    for tx in transactions {
        if session.already_seen(tx) {
            tracing::warn!(
                date = %tx.date,
                amount = %tx.formatted_amount,
                description = %tx.description,
                "looks like a duplicate of a journal entry"
            );
            if !keep_duplicates {
                continue;
            }
        }

        let suggested = session.best_account(tx);
        let account = suggested
            .clone()
            .unwrap_or_else(|| session.default_account(tx).to_string());
        let entry = render_entry(
            tx,
            &session.config().date_format,
            &session.config().bank_account,
            &account,
        );
        out.write_all(entry.as_bytes())?;
        if suggested.is_some() {
            session.accept(tx, &account);
        }
        written += 1;
    }
    Ok(written)
}
