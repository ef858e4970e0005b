//! Stock movement operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::classifier::parse_expiry_date;
use crate::error::EngineError;
use crate::models::{MovementKind, StockMovement};

/// Stock is stored as an integer but exposed as u32.
const MAX_STOCK: i64 = u32::MAX as i64;

impl Database {
    /// Record a movement and apply it to the medicine's stock.
    ///
    /// Consumption never drives stock below zero; an adjustment sets the
    /// stock to the given quantity. Returns the new quantity on hand.
    pub fn apply_movement(&self, movement: &StockMovement) -> DbResult<u32> {
        let tx = self.conn.unchecked_transaction()?;

        let current: Option<Option<i64>> = tx
            .query_row(
                "SELECT quantity_on_hand FROM medicines WHERE id = ?",
                [&movement.medicine_id],
                |row| row.get(0),
            )
            .optional()?;
        let current = current
            .ok_or_else(|| DbError::NotFound(format!("medicine {}", movement.medicine_id)))?
            .unwrap_or(0)
            .clamp(0, MAX_STOCK);

        let quantity = i64::from(movement.quantity);
        let updated = match movement.kind {
            MovementKind::Consumed => (current - quantity).max(0),
            MovementKind::Received => (current + quantity).min(MAX_STOCK),
            MovementKind::Adjusted => quantity,
        };

        tx.execute(
            r#"
            INSERT INTO stock_movements (medicine_id, kind, quantity, occurred_on)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                movement.medicine_id,
                movement.kind.as_str(),
                movement.quantity,
                movement.occurred_on.format("%Y-%m-%d").to_string(),
            ],
        )?;
        tx.execute(
            "UPDATE medicines SET quantity_on_hand = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![movement.medicine_id, updated],
        )?;
        tx.commit()?;

        tracing::debug!(
            medicine_id = %movement.medicine_id,
            kind = movement.kind.as_str(),
            quantity = movement.quantity,
            stock = updated,
            "applied stock movement"
        );

        Ok(u32::try_from(updated).unwrap_or(u32::MAX))
    }

    /// Movements on or after `since`, oldest first.
    pub fn list_movements_since(&self, since: NaiveDate) -> DbResult<Vec<StockMovement>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT medicine_id, kind, quantity, occurred_on
            FROM stock_movements
            WHERE occurred_on >= ?
            ORDER BY occurred_on, id
            "#,
        )?;
        let rows = stmt.query_map([since.format("%Y-%m-%d").to_string()], |row| {
            Ok(MovementRow {
                medicine_id: row.get(0)?,
                kind: row.get(1)?,
                quantity: row.get(2)?,
                occurred_on: row.get(3)?,
            })
        })?;

        let mut movements = Vec::new();
        for row in rows {
            movements.push(StockMovement::try_from(row?)?);
        }
        Ok(movements)
    }

    /// All movements for one medicine, oldest first.
    pub fn list_movements_for(&self, medicine_id: &str) -> DbResult<Vec<StockMovement>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT medicine_id, kind, quantity, occurred_on
            FROM stock_movements
            WHERE medicine_id = ?
            ORDER BY occurred_on, id
            "#,
        )?;
        let rows = stmt.query_map([medicine_id], |row| {
            Ok(MovementRow {
                medicine_id: row.get(0)?,
                kind: row.get(1)?,
                quantity: row.get(2)?,
                occurred_on: row.get(3)?,
            })
        })?;

        let mut movements = Vec::new();
        for row in rows {
            movements.push(StockMovement::try_from(row?)?);
        }
        Ok(movements)
    }
}

/// Intermediate row struct for database mapping.
struct MovementRow {
    medicine_id: String,
    kind: String,
    quantity: u32,
    occurred_on: String,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = DbError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let kind = MovementKind::parse(&row.kind).ok_or_else(|| {
            EngineError::InvalidArgument(format!("unknown movement kind {:?}", row.kind))
        })?;
        Ok(StockMovement {
            medicine_id: row.medicine_id,
            kind,
            quantity: row.quantity,
            occurred_on: parse_expiry_date(&row.occurred_on)?,
        })
    }
}
