//! SQLite-backed invoice line repository.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::StoreError;
use crate::models::invoice::{InvoiceLine, OwnerId, StoredInvoiceLine};
use crate::service::InvoiceRepository;

type StoreResult<T> = Result<T, StoreError>;

const SELECT_COLUMNS: &str =
    "SELECT id, quantity, description, price, total, user_id, created_at FROM invoices";

/// Raw column values of one `invoices` row.
type RawLine = (i64, i64, String, String, String, String, String);

/// Invoice lines in a single `invoices` table.
pub struct SqliteInvoiceRepository {
    conn: Connection,
}

impl SqliteInvoiceRepository {
    /// Open (and create if needed) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS invoices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                quantity INTEGER NOT NULL,
                description TEXT NOT NULL,
                price TEXT NOT NULL,
                total TEXT NOT NULL,
                user_id TEXT NOT NULL CHECK (length(user_id) > 0),
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_invoices_user_id ON invoices(user_id);",
        )?;
        Ok(Self { conn })
    }

    /// Stored lines in insertion order, optionally for one owner only.
    pub fn list(&self, owner: Option<&str>) -> StoreResult<Vec<StoredInvoiceLine>> {
        let raw: Vec<RawLine> = match owner {
            Some(owner) => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY id"))?;
                let rows = stmt.query_map(params![owner], raw_line)?;
                rows.collect::<Result<_, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
                let rows = stmt.query_map([], raw_line)?;
                rows.collect::<Result<_, _>>()?
            }
        };

        raw.into_iter().map(decode_line).collect()
    }

    /// A single stored line.
    pub fn get(&self, id: i64) -> StoreResult<Option<StoredInvoiceLine>> {
        let raw = self
            .conn
            .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id], raw_line)
            .optional()?;
        raw.map(decode_line).transpose()
    }

    /// Delete a stored line. Returns whether it existed.
    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM invoices WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM invoices", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl InvoiceRepository for SqliteInvoiceRepository {
    fn insert_batch(&self, lines: &[InvoiceLine]) -> StoreResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO invoices (quantity, description, price, total, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for line in lines {
                stmt.execute(params![
                    line.quantity,
                    line.description,
                    line.unit_price.to_string(),
                    line.total.to_string(),
                    line.owner_id.as_str(),
                    line.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;

        info!("Stored {} invoice lines", lines.len());
        Ok(lines.len())
    }
}

fn raw_line(row: &Row<'_>) -> rusqlite::Result<RawLine> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn decode_line(raw: RawLine) -> StoreResult<StoredInvoiceLine> {
    let (id, quantity, description, price, total, user_id, created_at) = raw;

    let owner_id = OwnerId::parse(Some(user_id.as_str())).map_err(|_| invalid("user_id", &user_id))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|_| invalid("created_at", &created_at))?
        .with_timezone(&Utc);

    Ok(StoredInvoiceLine {
        id,
        line: InvoiceLine {
            quantity,
            description,
            unit_price: decimal("price", &price)?,
            total: decimal("total", &total)?,
            owner_id,
            created_at,
        },
    })
}

fn decimal(column: &str, value: &str) -> StoreResult<Decimal> {
    Decimal::from_str(value).map_err(|_| invalid(column, value))
}

fn invalid(column: &str, value: &str) -> StoreError {
    StoreError::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn line(owner: &str, description: &str, price: Decimal, total: Decimal) -> InvoiceLine {
        InvoiceLine {
            quantity: 2,
            description: description.to_string(),
            unit_price: price,
            total,
            owner_id: OwnerId::parse(Some(owner)).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_insert_and_read_back() {
        let repo = SqliteInvoiceRepository::open_in_memory().unwrap();
        let lines = vec![
            line("alice", "Widget", Decimal::new(1050, 2), Decimal::new(2100, 2)),
            line("bob", "Gear", Decimal::new(1, 1), Decimal::new(2, 1)),
            line("alice", "Bolt", Decimal::new(333, 2), Decimal::new(666, 2)),
        ];

        assert_eq!(repo.insert_batch(&lines).unwrap(), 3);
        assert_eq!(repo.count().unwrap(), 3);

        let all = repo.list(None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].line, lines[0]);
        assert_eq!(all[0].line.unit_price.to_string(), "10.50");

        let alice = repo.list(Some("alice")).unwrap();
        let descriptions: Vec<&str> = alice.iter().map(|s| s.line.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Widget", "Bolt"]);

        let bob = repo.get(all[1].id).unwrap().unwrap();
        assert_eq!(bob.line, lines[1]);
        assert!(repo.get(999).unwrap().is_none());
    }

    #[test]
    fn test_batch_is_atomic() {
        let repo = SqliteInvoiceRepository::open_in_memory().unwrap();
        repo.conn
            .execute_batch(
                "CREATE TRIGGER reject_gear BEFORE INSERT ON invoices
                 WHEN NEW.description = 'Gear'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();
        let lines = vec![
            line("alice", "Widget", Decimal::ONE, Decimal::ONE),
            line("alice", "Gear", Decimal::ONE, Decimal::ONE),
        ];

        assert!(repo.insert_batch(&lines).is_err());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_delete() {
        let repo = SqliteInvoiceRepository::open_in_memory().unwrap();
        repo.insert_batch(&[line("alice", "Widget", Decimal::ONE, Decimal::ONE)]).unwrap();
        let id = repo.list(None).unwrap()[0].id;

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_file_database_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invtab.db");

        SqliteInvoiceRepository::open(&path)
            .unwrap()
            .insert_batch(&[line("alice", "Widget", Decimal::ONE, Decimal::ONE)])
            .unwrap();

        let reopened = SqliteInvoiceRepository::open(&path).unwrap();
        assert_eq!(reopened.list(Some("alice")).unwrap().len(), 1);
    }
}
