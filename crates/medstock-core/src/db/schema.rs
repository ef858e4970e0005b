//! SQLite schema definition.

/// Complete database schema for medstock.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Medicines
-- ============================================================================

-- Counts, price and date are nullable: rows imported from older systems may
-- lack them. Normalization happens when rows are read.
CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    quantity_on_hand INTEGER,
    reorder_point INTEGER,
    expiration_date TEXT,                        -- YYYY-MM-DD
    unit_price REAL,
    category TEXT,
    form TEXT,
    location TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_name ON medicines(name);
CREATE INDEX IF NOT EXISTS idx_medicines_expiration ON medicines(expiration_date);

-- ============================================================================
-- Stock Movements
-- ============================================================================

CREATE TABLE IF NOT EXISTS stock_movements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    medicine_id TEXT NOT NULL REFERENCES medicines(id) ON DELETE CASCADE,
    kind TEXT NOT NULL CHECK (kind IN ('consumed', 'received', 'adjusted')),
    quantity INTEGER NOT NULL CHECK (quantity >= 0),
    occurred_on TEXT NOT NULL,                   -- YYYY-MM-DD
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_movements_medicine ON stock_movements(medicine_id);
CREATE INDEX IF NOT EXISTS idx_movements_occurred ON stock_movements(occurred_on);
"#;
