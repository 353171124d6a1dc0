use crate::model::{CompletedPurchase, PurchasedProduct, StorageError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::info;

/// Completed-purchase records.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database file and creates the tables when missing.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::migrate(Connection::open(db_path)?)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::migrate(Connection::open_in_memory()?)
    }

    fn migrate(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS purchases (
                code TEXT PRIMARY KEY,
                client_code TEXT NOT NULL,
                client_name TEXT NOT NULL,
                date TEXT NOT NULL,
                total REAL NOT NULL
            );

            CREATE TABLE IF NOT EXISTS purchase_items (
                purchase_code TEXT NOT NULL REFERENCES purchases(code) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                product_code TEXT NOT NULL,
                product_name TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                unit_price REAL NOT NULL,
                subtotal REAL NOT NULL,
                PRIMARY KEY (purchase_code, position)
            );
            "
        )?;
        Ok(Self { conn })
    }

    /// Inserts or replaces a purchase together with its lines.
    pub fn save_purchase(&self, purchase: &CompletedPurchase) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO purchases (code, client_code, client_name, date, total)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &purchase.code,
                &purchase.client_code,
                &purchase.client_name,
                &purchase.date,
                &purchase.total,
            ],
        )?;
        tx.execute(
            "DELETE FROM purchase_items WHERE purchase_code = ?1",
            params![&purchase.code],
        )?;
        for (position, item) in purchase.items.iter().enumerate() {
            tx.execute(
                "INSERT INTO purchase_items (
                    purchase_code, position, product_code, product_name,
                    quantity, unit_price, subtotal
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    &purchase.code,
                    position as i64,
                    &item.product_code,
                    &item.product_name,
                    item.quantity,
                    item.unit_price,
                    item.subtotal,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Imports the seed records only when the table is still empty.
    /// Returns how many purchases were imported.
    pub fn seed_if_empty(&self, purchases: &[CompletedPurchase]) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM purchases", [], |row| row.get(0))?;
        if count > 0 {
            info!("Purchases table already holds {} records, skipping seed", count);
            return Ok(0);
        }
        for purchase in purchases {
            self.save_purchase(purchase)?;
        }
        info!("Seeded {} completed purchases", purchases.len());
        Ok(purchases.len())
    }

    pub fn find_all_purchases(&self) -> Result<Vec<CompletedPurchase>, StorageError> {
        self.query_purchases(
            "SELECT code, client_code, client_name, date, total FROM purchases ORDER BY code ASC",
            None,
        )
    }

    pub fn find_purchase_by_code(&self, code: &str) -> Result<Option<CompletedPurchase>, StorageError> {
        let mut found = self.query_purchases(
            "SELECT code, client_code, client_name, date, total FROM purchases
             WHERE code = ?1 COLLATE NOCASE",
            Some(code),
        )?;
        Ok(found.pop())
    }

    pub fn find_purchases_by_client(&self, client_code: &str) -> Result<Vec<CompletedPurchase>, StorageError> {
        self.query_purchases(
            "SELECT code, client_code, client_name, date, total FROM purchases
             WHERE client_code = ?1 COLLATE NOCASE ORDER BY date ASC, code ASC",
            Some(client_code),
        )
    }

    fn query_purchases(&self, sql: &str, arg: Option<&str>) -> Result<Vec<CompletedPurchase>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = match arg {
            Some(value) => stmt.query_map(params![value], Self::map_purchase)?,
            None => stmt.query_map([], Self::map_purchase)?,
        };

        let mut purchases = Vec::new();
        for row in rows {
            let mut purchase = row?;
            purchase.items = self.load_items(&purchase.code)?;
            purchases.push(purchase);
        }
        Ok(purchases)
    }

    fn load_items(&self, purchase_code: &str) -> Result<Vec<PurchasedProduct>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT product_code, product_name, quantity, unit_price, subtotal
             FROM purchase_items WHERE purchase_code = ?1 ORDER BY position ASC",
        )?;
        let rows = stmt.query_map(params![purchase_code], |row| {
            Ok(PurchasedProduct {
                product_code: row.get(0)?,
                product_name: row.get(1)?,
                quantity: row.get(2)?,
                unit_price: row.get(3)?,
                subtotal: row.get(4)?,
            })
        })?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item?);
        }
        Ok(items)
    }

    /// Maps the header columns; lines are attached by the caller.
    fn map_purchase(row: &Row) -> Result<CompletedPurchase, rusqlite::Error> {
        let date: NaiveDate = row.get(3)?;
        Ok(CompletedPurchase {
            code: row.get(0)?,
            client_code: row.get(1)?,
            client_name: row.get(2)?,
            date,
            items: Vec::new(),
            total: row.get(4)?,
        })
    }
}

#[cfg(test)]
pub(crate) fn fixture_purchases() -> Vec<CompletedPurchase> {
    serde_json::from_str(include_str!("../../data/database/completed-purchases.json")).unwrap()
}
