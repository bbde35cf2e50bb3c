use std::io::Write;

use lettrage_core::{format_amount, InvoiceRecord, MatchResult, Transaction};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub const MATCH_REPORT_HEADER: [&str; 9] = [
    "filename",
    "invoice_number",
    "invoice_date",
    "total_amount",
    "matched",
    "match_score",
    "bank_date",
    "bank_amount",
    "bank_description",
];

// ── XML ──────────────────────────────────────────────────────────────────────

/// `<invoices>` document with one `<invoice>` per record. Missing values are
/// written as empty elements.
pub fn invoices_to_xml(records: &[InvoiceRecord]) -> anyhow::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("invoices")))?;

    for r in records {
        writer.write_event(Event::Start(BytesStart::new("invoice")))?;
        let date = r.invoice_date.map(|d| d.to_string());
        let total = r.total_amount.map(format_amount);
        write_field(&mut writer, "filename", Some(&r.filename))?;
        write_field(&mut writer, "invoice_number", r.invoice_number.as_deref())?;
        write_field(&mut writer, "invoice_date", date.as_deref())?;
        write_field(&mut writer, "total_amount", total.as_deref())?;
        write_field(&mut writer, "currency", Some(&r.currency))?;
        writer.write_event(Event::End(BytesEnd::new("invoice")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("invoices")))?;
    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_field<W: Write>(writer: &mut Writer<W>, name: &str, value: Option<&str>) -> anyhow::Result<()> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(v)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        None => writer.write_event(Event::Empty(BytesStart::new(name)))?,
    }
    Ok(())
}

// ── CSV ──────────────────────────────────────────────────────────────────────

pub fn match_report_to_csv<W: Write>(results: &[MatchResult], out: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(MATCH_REPORT_HEADER)?;

    for r in results {
        wtr.write_record([
            r.filename.clone(),
            r.invoice_number.clone().unwrap_or_default(),
            r.invoice_date.map(|d| d.to_string()).unwrap_or_default(),
            r.total_amount.map(format_amount).unwrap_or_default(),
            r.matched.to_string(),
            r.match_score.map(|s| format!("{s:?}")).unwrap_or_default(),
            r.bank_date.map(|d| d.to_string()).unwrap_or_default(),
            r.bank_amount.map(format_amount).unwrap_or_default(),
            r.bank_description.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Canonical statement table: `date,description,amount`.
pub fn transactions_to_csv<W: Write>(transactions: &[Transaction], out: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["date", "description", "amount"])?;
    for tx in transactions {
        wtr.write_record([tx.date.to_string(), tx.description.clone(), format_amount(tx.amount)])?;
    }
    wtr.flush()?;
    Ok(())
}
