use std::path::PathBuf;

use clap::Args;
use lettrage_core::{format_amount, InvoiceRecord, Settings};

use super::{extract_invoices, show, write_file, EnrichArgs};
use crate::export::invoices_to_xml;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Invoice PDF files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Write the extracted invoices as XML to this file
    #[arg(long)]
    pub xml: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub enrich: EnrichArgs,
}

pub async fn run(args: ExtractArgs, mut settings: Settings) -> anyhow::Result<()> {
    args.enrich.apply(&mut settings.enrichment);
    let records = extract_invoices(&args.files, &settings.enrichment).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_table(&records);
    }

    if let Some(path) = &args.xml {
        write_file(path, &invoices_to_xml(&records)?)?;
    }
    Ok(())
}

fn print_table(records: &[InvoiceRecord]) {
    println!("{} invoice(s) extracted", records.len());
    if records.is_empty() {
        return;
    }
    println!(
        "{:<30} {:<20} {:<12} {:>12} {:<4}",
        "filename", "invoice_number", "date", "total", "cur"
    );
    for r in records {
        println!(
            "{:<30} {:<20} {:<12} {:>12} {:<4}",
            r.filename,
            show(r.invoice_number.as_deref()),
            show(r.invoice_date),
            show(r.total_amount.map(format_amount)),
            r.currency
        );
    }
}
