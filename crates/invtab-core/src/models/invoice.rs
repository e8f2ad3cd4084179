//! Invoice line records produced by extraction.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Identifier of the invoice owner, validated at the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Validate a caller-supplied owner identifier.
    ///
    /// Absent and blank identifiers are rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self, ExtractionError> {
        match raw.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => Err(ExtractionError::MissingOwnerId),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = ExtractionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(Some(&value))
    }
}

impl From<OwnerId> for String {
    fn from(owner: OwnerId) -> Self {
        owner.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single invoice line reconstructed from one table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Quantity (0 when no quantity column was found).
    pub quantity: i64,

    /// Product/service description.
    pub description: String,

    /// Unit price.
    pub unit_price: Decimal,

    /// Line total.
    pub total: Decimal,

    /// Owner the line belongs to.
    pub owner_id: OwnerId,

    /// Extraction timestamp, shared by all lines of one run.
    pub created_at: DateTime<Utc>,
}

/// An invoice line after the repository assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredInvoiceLine {
    /// Repository identifier.
    pub id: i64,

    #[serde(flatten)]
    pub line: InvoiceLine,
}

/// Sum of line totals, or `None` when it does not fit in a `Decimal`.
pub fn total_of(lines: &[InvoiceLine]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.total))
}
