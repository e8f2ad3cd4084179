//! Header keyword rules and cell value parsing for invoice line tables.

pub mod fields;
pub mod patterns;
pub mod values;

pub use fields::{ColumnMapping, FieldMapper, FieldRule, FieldRules, InvoiceField};
pub use patterns::*;
pub use values::{non_blank, parse_amount, parse_quantity};
