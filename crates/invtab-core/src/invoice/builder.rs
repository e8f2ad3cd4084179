//! Typed invoice lines from mapped table rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::rules::{non_blank, parse_amount, parse_quantity, ColumnMapping, InvoiceField};
use crate::error::ExtractionError;
use crate::models::invoice::{InvoiceLine, OwnerId};
use crate::table::Row;

/// Applies a column mapping to rows, stamping owner and timestamp.
#[derive(Debug, Clone)]
pub struct InvoiceBuilder<'a> {
    owner_id: &'a OwnerId,
    created_at: DateTime<Utc>,
}

impl<'a> InvoiceBuilder<'a> {
    pub fn new(owner_id: &'a OwnerId, created_at: DateTime<Utc>) -> Self {
        Self { owner_id, created_at }
    }

    /// One line per row, in row order. The first malformed numeric cell
    /// aborts the whole batch.
    pub fn build(
        &self,
        rows: &[Row],
        mapping: &ColumnMapping,
    ) -> Result<Vec<InvoiceLine>, ExtractionError> {
        rows.iter().map(|row| self.build_line(row, mapping)).collect()
    }

    /// Build a single line. Unmapped fields, cells past the end of a short
    /// row and blank cells take the field default.
    pub fn build_line(
        &self,
        row: &Row,
        mapping: &ColumnMapping,
    ) -> Result<InvoiceLine, ExtractionError> {
        let quantity = match cell(row, mapping, InvoiceField::Quantity) {
            Some((column, value)) => parse_quantity(value)
                .ok_or_else(|| malformed(row, column, InvoiceField::Quantity, value))?,
            None => 0,
        };

        // Description text is kept verbatim; only blank cells fall back.
        let description = cell(row, mapping, InvoiceField::Description)
            .and_then(|(column, _)| row.get(column))
            .map(str::to_string)
            .unwrap_or_default();

        let unit_price = amount(row, mapping, InvoiceField::UnitPrice)?;
        let total = amount(row, mapping, InvoiceField::Total)?;

        Ok(InvoiceLine {
            quantity,
            description,
            unit_price,
            total,
            owner_id: self.owner_id.clone(),
            created_at: self.created_at,
        })
    }
}

/// Default monetary value, `0.00`.
pub fn zero_amount() -> Decimal {
    Decimal::new(0, 2)
}

/// Column and trimmed text of the cell feeding `field`, when there is one.
fn cell<'r>(row: &'r Row, mapping: &ColumnMapping, field: InvoiceField) -> Option<(usize, &'r str)> {
    let column = mapping.column(field)?;
    let value = non_blank(row.get(column)?)?;
    Some((column, value))
}

fn amount(row: &Row, mapping: &ColumnMapping, field: InvoiceField) -> Result<Decimal, ExtractionError> {
    match cell(row, mapping, field) {
        Some((column, value)) => {
            parse_amount(value).ok_or_else(|| malformed(row, column, field, value))
        }
        None => Ok(zero_amount()),
    }
}

fn malformed(row: &Row, column: usize, field: InvoiceField, value: &str) -> ExtractionError {
    ExtractionError::MalformedCell {
        row: row.index,
        column,
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::FieldMapper;
    use crate::table::RowAssembler;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_build_mapped_row() {
        let owner = OwnerId::parse(Some("user-1")).unwrap();
        let mapping = FieldMapper::default().map(&strings(&["Qtd", "Descricao", "Preco", "Valor Total"]));
        let rows = RowAssembler::assemble(strings(&["3", "Widget", "10.50", "31.50"]), 4);

        let lines = InvoiceBuilder::new(&owner, timestamp()).build(&rows, &mapping).unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].description, "Widget");
        assert_eq!(lines[0].unit_price, Decimal::new(1050, 2));
        assert_eq!(lines[0].total, Decimal::new(3150, 2));
        assert_eq!(lines[0].owner_id, owner);
        assert_eq!(lines[0].created_at, timestamp());
    }

    #[test]
    fn test_unmapped_fields_default() {
        let owner = OwnerId::parse(Some("user-1")).unwrap();
        let mapping = FieldMapper::default().map(&strings(&["Item", "Descrição"]));
        let rows = RowAssembler::assemble(strings(&["1", "Bolt", "2", "Nut"]), 2);

        let lines = InvoiceBuilder::new(&owner, timestamp()).build(&rows, &mapping).unwrap();

        assert_eq!(lines.len(), 2);
        for (line, description) in lines.iter().zip(["Bolt", "Nut"]) {
            assert_eq!(line.quantity, 0);
            assert_eq!(line.description, description);
            assert_eq!(line.unit_price, zero_amount());
            assert_eq!(line.total, zero_amount());
        }
        assert_eq!(lines[0].total.to_string(), "0.00");
    }

    #[test]
    fn test_short_row_and_blank_cells_default() {
        let owner = OwnerId::parse(Some("user-1")).unwrap();
        let mapping = FieldMapper::default().map(&strings(&["Qtd", "Description", "Price", "Value"]));
        let rows = RowAssembler::assemble(strings(&["2", " ", "", "4.00", "5", "Gear"]), 4);

        let lines = InvoiceBuilder::new(&owner, timestamp()).build(&rows, &mapping).unwrap();

        assert_eq!(lines[0].description, "");
        assert_eq!(lines[0].unit_price, zero_amount());
        assert_eq!(lines[0].total, Decimal::new(400, 2));
        assert_eq!(lines[1].quantity, 5);
        assert_eq!(lines[1].description, "Gear");
        assert_eq!(lines[1].total, zero_amount());
    }

    #[test]
    fn test_description_is_not_trimmed() {
        let owner = OwnerId::parse(Some("user-1")).unwrap();
        let mapping = FieldMapper::default().map(&strings(&["Qtd", "Descrição"]));
        let rows = RowAssembler::assemble(strings(&[" 2 ", "  Porca  M8 "]), 2);

        let lines = InvoiceBuilder::new(&owner, timestamp()).build(&rows, &mapping).unwrap();
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].description, "  Porca  M8 ");
    }

    #[test]
    fn test_malformed_quantity() {
        let owner = OwnerId::parse(Some("user-1")).unwrap();
        let mapping = FieldMapper::default().map(&strings(&["Descrição", "Quantidade"]));
        let rows = RowAssembler::assemble(strings(&["A", "1", "B", "two"]), 2);

        let err = InvoiceBuilder::new(&owner, timestamp()).build(&rows, &mapping).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::MalformedCell {
                row: 1,
                column: 1,
                field: InvoiceField::Quantity,
                value: "two".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_price() {
        let owner = OwnerId::parse(Some("user-1")).unwrap();
        let mapping = FieldMapper::default().map(&strings(&["Price"]));
        let rows = RowAssembler::assemble(strings(&["R$ 10,00"]), 1);

        let err = InvoiceBuilder::new(&owner, timestamp()).build(&rows, &mapping).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::MalformedCell { row: 0, column: 0, field: InvoiceField::UnitPrice, .. }
        ));
    }

    #[test]
    fn test_no_rows() {
        let owner = OwnerId::parse(Some("user-1")).unwrap();
        let lines = InvoiceBuilder::new(&owner, timestamp())
            .build(&[], &ColumnMapping::default())
            .unwrap();
        assert!(lines.is_empty());
    }
}
