//! Header keyword patterns for invoice line tables.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Quantity column (Portuguese and English)
    pub static ref QUANTITY_HEADER: Regex = Regex::new(
        r"(?i)\b(qtd|quantidade|quantity)\b"
    ).unwrap();

    // Description column, accented and unaccented spelling
    pub static ref DESCRIPTION_HEADER: Regex = Regex::new(
        r"(?i)\b(descrição|descricao|description)\b"
    ).unwrap();

    // Unit price column
    pub static ref PRICE_HEADER: Regex = Regex::new(
        r"(?i)\b(preço|price|preco)\b"
    ).unwrap();

    // Line total column ("Valor", "Valor Total", "Value")
    pub static ref TOTAL_HEADER: Regex = Regex::new(
        r"(?i)\b(valor|value)\b"
    ).unwrap();
}
