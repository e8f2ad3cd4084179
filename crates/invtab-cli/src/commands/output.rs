//! Rendering invoice lines as JSON, CSV or text.

use chrono::SecondsFormat;
use serde::Serialize;

use rust_decimal::Decimal;

use invtab_core::models::invoice::{total_of, InvoiceLine, StoredInvoiceLine};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Flat record shared by every output format.
#[derive(Debug, Serialize)]
struct LineRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    quantity: i64,
    description: &'a str,
    unit_price: String,
    total: String,
    owner_id: &'a str,
    created_at: String,
}

impl<'a> LineRecord<'a> {
    fn new(id: Option<i64>, line: &'a InvoiceLine) -> Self {
        Self {
            id,
            quantity: line.quantity,
            description: &line.description,
            unit_price: line.unit_price.to_string(),
            total: line.total.to_string(),
            owner_id: line.owner_id.as_str(),
            created_at: line.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Render freshly extracted lines.
pub fn format_lines(lines: &[InvoiceLine], format: OutputFormat) -> anyhow::Result<String> {
    let records: Vec<LineRecord> = lines.iter().map(|line| LineRecord::new(None, line)).collect();
    render(&records, || total_of(lines), format)
}

/// Render lines read back from the repository.
pub fn format_stored(lines: &[StoredInvoiceLine], format: OutputFormat) -> anyhow::Result<String> {
    let records: Vec<LineRecord> = lines
        .iter()
        .map(|stored| LineRecord::new(Some(stored.id), &stored.line))
        .collect();
    let plain: Vec<InvoiceLine> = lines.iter().map(|stored| stored.line.clone()).collect();
    render(&records, || total_of(&plain), format)
}

/// Printable sum of line totals; `"overflow"` when it exceeds `Decimal`.
pub fn total_label(total: Option<Decimal>) -> String {
    total.map_or_else(|| "overflow".to_string(), |total| total.to_string())
}

fn render(
    records: &[LineRecord],
    total: impl FnOnce() -> Option<Decimal>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records, &total_label(total()))),
    }
}

fn format_csv(records: &[LineRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[LineRecord], total: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:>6}  {:>5}  {:<32}  {:>12}  {:>12}\n",
        "#", "Qty", "Description", "Unit price", "Total"
    ));
    for (n, record) in records.iter().enumerate() {
        let number = record.id.unwrap_or(n as i64 + 1);
        output.push_str(&format!(
            "{:>6}  {:>5}  {:<32}  {:>12}  {:>12}\n",
            number, record.quantity, record.description, record.unit_price, record.total
        ));
    }
    output.push('\n');
    output.push_str(&format!("Lines: {}\n", records.len()));
    output.push_str(&format!("Total: {}\n", total));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(description: &str, quantity: i64, unit_price: &str, total: &str) -> InvoiceLine {
        serde_json::from_value(serde_json::json!({
            "quantity": quantity,
            "description": description,
            "unit_price": unit_price,
            "total": total,
            "owner_id": "user-1",
            "created_at": "2024-03-01T12:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_csv_output() {
        let lines = vec![line("Bolt, steel", 3, "1.50", "4.50")];
        let csv = format_lines(&lines, OutputFormat::Csv).unwrap();

        assert_eq!(
            csv,
            "quantity,description,unit_price,total,owner_id,created_at\n\
             3,\"Bolt, steel\",1.50,4.50,user-1,2024-03-01T12:00:00Z\n"
        );
    }

    #[test]
    fn test_stored_lines_carry_ids() {
        let stored = vec![StoredInvoiceLine {
            id: 42,
            line: line("Nut", 1, "0.40", "0.40"),
        }];

        let json = format_stored(&stored, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], 42);
        assert_eq!(value[0]["total"], "0.40");

        let text = format_stored(&stored, OutputFormat::Text).unwrap();
        assert!(text.contains("    42"));
        assert!(text.ends_with("Total: 0.40\n"));
    }

    #[test]
    fn test_text_totals() {
        let lines = vec![line("Bolt", 2, "1.50", "3.00"), line("Nut", 1, "0.40", "0.40")];
        let text = format_lines(&lines, OutputFormat::Text).unwrap();

        assert!(text.contains("Lines: 2\n"));
        assert!(text.ends_with("Total: 3.40\n"));
    }

    #[test]
    fn test_total_overflow_is_reported() {
        let max = Decimal::MAX.to_string();
        let lines = vec![line("Bolt", 1, &max, &max), line("Nut", 1, &max, &max)];

        let json = format_lines(&lines, OutputFormat::Json).unwrap();
        assert!(json.contains(&max));
        assert!(format_lines(&lines, OutputFormat::Csv).is_ok());

        let text = format_lines(&lines, OutputFormat::Text).unwrap();
        assert!(text.ends_with("Total: overflow\n"));
    }
}
