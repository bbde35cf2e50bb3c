use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use lettrage_core::{AssignmentMode, MatchingConfig, Settings};
use lettrage_import::{load_statement, MatchEngine};
use rust_decimal::Decimal;

use super::{extract_invoices, write_file, EnrichArgs};
use crate::export::{invoices_to_xml, match_report_to_csv};

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Bank statement file
    #[arg(short, long)]
    pub statement: PathBuf,

    /// Invoice PDF files
    #[arg(required = true)]
    pub invoices: Vec<PathBuf>,

    /// Write the match report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Largest accepted gap between invoice total and payment
    #[arg(long)]
    pub amount_tolerance: Option<Decimal>,

    /// Largest accepted delay in days between invoice and payment
    #[arg(long)]
    pub max_days: Option<i64>,

    /// Use each transaction for at most one invoice
    #[arg(long)]
    pub exclusive: bool,

    /// Also write the extracted invoices as XML to this file
    #[arg(long)]
    pub xml: Option<PathBuf>,

    #[command(flatten)]
    pub enrich: EnrichArgs,
}

impl MatchArgs {
    fn apply(&self, config: &mut MatchingConfig) {
        if let Some(tol) = self.amount_tolerance {
            config.amount_tolerance = tol;
        }
        if let Some(days) = self.max_days {
            config.max_days_delta = days;
        }
        if self.exclusive {
            config.mode = AssignmentMode::Exclusive;
        }
    }
}

pub async fn run(args: MatchArgs, mut settings: Settings) -> anyhow::Result<()> {
    args.enrich.apply(&mut settings.enrichment);
    args.apply(&mut settings.matching);

    let invoices = extract_invoices(&args.invoices, &settings.enrichment).await?;
    eprintln!("{} invoice(s) extracted", invoices.len());

    let transactions = load_statement(&args.statement)
        .with_context(|| format!("loading statement {}", args.statement.display()))?;
    eprintln!("{} transaction(s) loaded", transactions.len());

    let results = MatchEngine::from_config(&settings.matching).match_invoices(&invoices, &transactions);
    eprintln!(
        "{}/{} invoice(s) matched",
        results.iter().filter(|r| r.matched).count(),
        results.len()
    );

    match &args.output {
        Some(path) => {
            let mut buf = Vec::new();
            match_report_to_csv(&results, &mut buf)?;
            write_file(path, &buf)?;
        }
        None => match_report_to_csv(&results, std::io::stdout().lock())?,
    }

    if let Some(path) = &args.xml {
        write_file(path, &invoices_to_xml(&invoices)?)?;
    }
    Ok(())
}
