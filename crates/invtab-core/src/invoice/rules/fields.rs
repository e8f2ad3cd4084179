//! Column-to-field mapping by header keywords.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::patterns::{DESCRIPTION_HEADER, PRICE_HEADER, QUANTITY_HEADER, TOTAL_HEADER};

/// Invoice line field a table column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceField {
    Quantity,
    Description,
    UnitPrice,
    Total,
}

impl InvoiceField {
    /// All fields in line order.
    pub const ALL: [InvoiceField; 4] = [
        InvoiceField::Quantity,
        InvoiceField::Description,
        InvoiceField::UnitPrice,
        InvoiceField::Total,
    ];
}

impl fmt::Display for InvoiceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InvoiceField::Quantity => "quantity",
            InvoiceField::Description => "description",
            InvoiceField::UnitPrice => "unit price",
            InvoiceField::Total => "total",
        };
        f.write_str(name)
    }
}

/// A header pattern that marks a column as feeding `field`.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: InvoiceField,
    pub pattern: Regex,
}

/// Ordered keyword table used by [`FieldMapper`].
#[derive(Debug, Clone)]
pub struct FieldRules {
    rules: Vec<FieldRule>,
}

impl FieldRules {
    /// An empty table; every field stays unmapped until rules are added.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a header pattern for a field.
    pub fn with_rule(mut self, field: InvoiceField, pattern: Regex) -> Self {
        self.rules.push(FieldRule { field, pattern });
        self
    }

    /// Add a case-insensitive whole-word rule built from plain keywords.
    /// Blank keywords are ignored.
    pub fn with_keywords(self, field: InvoiceField, keywords: &[&str]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Ok(self);
        }

        let pattern = Regex::new(&format!(r"(?i)\b({})\b", alternatives.join("|")))?;
        Ok(self.with_rule(field, pattern))
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for FieldRules {
    /// Portuguese and English invoice headers.
    fn default() -> Self {
        Self::new()
            .with_rule(InvoiceField::Quantity, QUANTITY_HEADER.clone())
            .with_rule(InvoiceField::Description, DESCRIPTION_HEADER.clone())
            .with_rule(InvoiceField::UnitPrice, PRICE_HEADER.clone())
            .with_rule(InvoiceField::Total, TOTAL_HEADER.clone())
    }
}

/// Column index chosen for each mapped field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: BTreeMap<InvoiceField, usize>,
}

impl ColumnMapping {
    /// Column feeding `field`, if any header matched.
    pub fn column(&self, field: InvoiceField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Fields no header matched, in line order.
    pub fn unmapped(&self) -> Vec<InvoiceField> {
        InvoiceField::ALL
            .into_iter()
            .filter(|field| !self.columns.contains_key(field))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InvoiceField, usize)> + '_ {
        self.columns.iter().map(|(field, column)| (*field, *column))
    }

    fn assign(&mut self, field: InvoiceField, column: usize) {
        self.columns
            .entry(field)
            .and_modify(|current| *current = (*current).min(column))
            .or_insert(column);
    }
}

/// Maps header labels to invoice fields.
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    rules: FieldRules,
}

impl FieldMapper {
    pub fn new(rules: FieldRules) -> Self {
        Self { rules }
    }

    /// For each field, the first header any of its rules matches. The same
    /// column may feed several fields.
    pub fn map(&self, headers: &[String]) -> ColumnMapping {
        let mut mapping = ColumnMapping::default();

        for rule in self.rules.rules() {
            if let Some(column) = headers.iter().position(|h| rule.pattern.is_match(h)) {
                mapping.assign(rule.field, column);
            }
        }

        debug!("Column mapping: {:?}", mapping.columns);
        mapping
    }
}
