//! Medicine database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::inventory::{InventoryLoad, MedicineSource};
use crate::models::{Medicine, RawId, RawMedicine};

const SELECT_MEDICINE: &str = r#"
    SELECT id, name, quantity_on_hand, reorder_point, expiration_date,
           unit_price, category, form, location
    FROM medicines
"#;

impl Database {
    /// Insert or update a medicine.
    pub fn upsert_medicine(&self, medicine: &Medicine) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medicines (
                id, name, quantity_on_hand, reorder_point, expiration_date,
                unit_price, category, form, location, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                quantity_on_hand = excluded.quantity_on_hand,
                reorder_point = excluded.reorder_point,
                expiration_date = excluded.expiration_date,
                unit_price = excluded.unit_price,
                category = excluded.category,
                form = excluded.form,
                location = excluded.location,
                updated_at = datetime('now')
            "#,
            params![
                medicine.id,
                medicine.name,
                medicine.quantity_on_hand,
                medicine.reorder_point,
                medicine.expiration_date.format("%Y-%m-%d").to_string(),
                medicine.unit_price,
                medicine.category,
                medicine.form,
                medicine.location,
            ],
        )?;
        Ok(())
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: &str) -> DbResult<Option<Medicine>> {
        let sql = format!("{} WHERE id = ?", SELECT_MEDICINE);
        let row = self
            .conn
            .query_row(&sql, [id], MedicineRow::from_row)
            .optional()?;

        match row {
            Some(row) => Ok(Some(RawMedicine::from(row).normalize()?)),
            None => Ok(None),
        }
    }

    /// Load every medicine, ordered by name.
    ///
    /// Rows that cannot be normalized are reported in `rejected`.
    pub fn list_medicines(&self) -> DbResult<InventoryLoad> {
        let sql = format!("{} ORDER BY name, id", SELECT_MEDICINE);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], MedicineRow::from_row)?;

        let mut raw = Vec::new();
        for row in rows {
            raw.push(RawMedicine::from(row?));
        }

        let load = InventoryLoad::from_raw(raw);
        for rejected in &load.rejected {
            tracing::warn!(
                id = rejected.id.as_deref().unwrap_or("?"),
                reason = %rejected.reason,
                "skipping medicine row"
            );
        }
        Ok(load)
    }

    /// Delete a medicine and its movements.
    pub fn delete_medicine(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medicines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Get a medicine by id, failing if it does not exist.
    pub fn require_medicine(&self, id: &str) -> DbResult<Medicine> {
        self.get_medicine(id)?
            .ok_or_else(|| DbError::NotFound(format!("medicine {}", id)))
    }
}

impl MedicineSource for Database {
    type Error = DbError;

    fn list_medicines(&self) -> DbResult<InventoryLoad> {
        Database::list_medicines(self)
    }
}

/// Intermediate row struct for database mapping.
struct MedicineRow {
    id: String,
    name: String,
    quantity_on_hand: Option<i64>,
    reorder_point: Option<i64>,
    expiration_date: Option<String>,
    unit_price: Option<f64>,
    category: Option<String>,
    form: Option<String>,
    location: Option<String>,
}

impl MedicineRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            quantity_on_hand: row.get(2)?,
            reorder_point: row.get(3)?,
            expiration_date: row.get(4)?,
            unit_price: row.get(5)?,
            category: row.get(6)?,
            form: row.get(7)?,
            location: row.get(8)?,
        })
    }
}

impl From<MedicineRow> for RawMedicine {
    fn from(row: MedicineRow) -> Self {
        RawMedicine {
            id: Some(RawId::Text(row.id)),
            name: Some(row.name),
            quantity_on_hand: row.quantity_on_hand.map(|v| v as f64),
            reorder_point: row.reorder_point.map(|v| v as f64),
            expiration_date: row.expiration_date,
            unit_price: row.unit_price,
            category: row.category,
            form: row.form,
            location: row.location,
        }
    }
}
