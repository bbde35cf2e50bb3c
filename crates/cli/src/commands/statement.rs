use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use lettrage_core::format_amount;
use lettrage_import::load_statement;

use super::write_file;
use crate::export::transactions_to_csv;

#[derive(Args, Debug)]
pub struct StatementArgs {
    /// Statement file (.csv, .tsv, .txt, .xlsx, .xls, .ods or .pdf)
    pub file: PathBuf,

    /// Write the normalized transactions as CSV to this file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn run(args: StatementArgs) -> anyhow::Result<()> {
    let transactions = load_statement(&args.file)
        .with_context(|| format!("loading statement {}", args.file.display()))?;

    let outflows = transactions.iter().filter(|t| t.is_outflow()).count();
    println!(
        "{} transaction(s), {} outflow(s), {} inflow(s)",
        transactions.len(),
        outflows,
        transactions.len() - outflows
    );
    for tx in &transactions {
        println!("{}  {:>12}  {}", tx.date, format_amount(tx.amount), tx.description);
    }

    if let Some(path) = &args.csv {
        let mut buf = Vec::new();
        transactions_to_csv(&transactions, &mut buf)?;
        write_file(path, &buf)?;
    }
    Ok(())
}
