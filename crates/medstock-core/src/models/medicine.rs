//! Medicine records.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::classifier::parse_expiry_date;
use crate::error::{EngineError, EngineResult};

/// A medicine in canonical shape, as the engine reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// Unique identifier, stable across calls
    pub id: String,
    /// Display name
    pub name: String,
    /// Current stock
    pub quantity_on_hand: u32,
    /// Threshold below which stock is low
    pub reorder_point: u32,
    /// Calendar date of expiry
    pub expiration_date: NaiveDate,
    /// Price per unit, used for valuation only
    pub unit_price: f64,
    /// Therapeutic category (e.g., "analgesic")
    pub category: Option<String>,
    /// Dosage form (e.g., "tablet", "syrup")
    pub form: Option<String>,
    /// Storage location (e.g., "Shelf A3")
    pub location: Option<String>,
}

impl Medicine {
    /// Create a medicine with a generated id and no stock.
    pub fn new(name: String, expiration_date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            quantity_on_hand: 0,
            reorder_point: 0,
            expiration_date,
            unit_price: 0.0,
            category: None,
            form: None,
            location: None,
        }
    }

    /// Stock value of this line (`unit_price × quantity_on_hand`).
    pub fn stock_value(&self) -> f64 {
        self.unit_price * f64::from(self.quantity_on_hand)
    }

    /// Whether stock is below the reorder point.
    pub fn is_below_reorder_point(&self) -> bool {
        self.quantity_on_hand < self.reorder_point
    }
}

/// Identifier as found in stored records: numeric or textual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawId::Int(n) => write!(f, "{}", n),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

/// A medicine as stored by the datastore, before normalization.
///
/// Older records use different field names for the same data. Deserializing
/// folds them into one shape so nothing downstream needs fallbacks; when a
/// record carries several spellings, the first non-null one in the key lists
/// below wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct RawMedicine {
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub quantity_on_hand: Option<f64>,
    pub reorder_point: Option<f64>,
    pub expiration_date: Option<String>,
    pub unit_price: Option<f64>,
    pub category: Option<String>,
    pub form: Option<String>,
    pub location: Option<String>,
}

const ID_KEYS: &[&str] = &["id"];
const NAME_KEYS: &[&str] = &["name", "nombre"];
const QUANTITY_KEYS: &[&str] = &["quantity_on_hand", "quantityOnHand", "stock_actual", "quantity"];
const REORDER_KEYS: &[&str] = &["reorder_point", "reorderPoint", "stock_minimo", "min_stock"];
const EXPIRATION_KEYS: &[&str] = &[
    "expiration_date",
    "expirationDate",
    "expiry_date",
    "fecha_vencimiento",
];
const PRICE_KEYS: &[&str] = &["unit_price", "unitPrice", "price", "precio"];
const CATEGORY_KEYS: &[&str] = &["category", "categoria"];
const FORM_KEYS: &[&str] = &["form"];
const LOCATION_KEYS: &[&str] = &["location", "ubicacion"];

impl TryFrom<Map<String, Value>> for RawMedicine {
    type Error = String;

    fn try_from(mut record: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: take_first(&mut record, ID_KEYS)?,
            name: take_first(&mut record, NAME_KEYS)?,
            quantity_on_hand: take_first(&mut record, QUANTITY_KEYS)?,
            reorder_point: take_first(&mut record, REORDER_KEYS)?,
            expiration_date: take_first(&mut record, EXPIRATION_KEYS)?,
            unit_price: take_first(&mut record, PRICE_KEYS)?,
            category: take_first(&mut record, CATEGORY_KEYS)?,
            form: take_first(&mut record, FORM_KEYS)?,
            location: take_first(&mut record, LOCATION_KEYS)?,
        })
    }
}

/// Value of the first key in `keys` that is present and not null.
fn take_first<T: DeserializeOwned>(
    record: &mut Map<String, Value>,
    keys: &[&str],
) -> Result<Option<T>, String> {
    for key in keys {
        match record.remove(*key) {
            None | Some(Value::Null) => continue,
            Some(value) => {
                return serde_json::from_value(value)
                    .map(Some)
                    .map_err(|e| format!("field `{}`: {}", key, e))
            }
        }
    }
    Ok(None)
}

impl RawMedicine {
    /// Fold this record into the canonical [`Medicine`] shape.
    ///
    /// Missing or negative counts and prices become 0. The expiration date is
    /// required and must parse.
    pub fn normalize(self) -> EngineResult<Medicine> {
        let id = match self.id {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        let raw_date = self.expiration_date.ok_or_else(|| {
            EngineError::InvalidDate(format!("medicine {} has no expiration date", id))
        })?;
        let expiration_date = parse_expiry_date(&raw_date)?;

        Ok(Medicine {
            name: self.name.unwrap_or_default(),
            quantity_on_hand: clamp_count(self.quantity_on_hand),
            reorder_point: clamp_count(self.reorder_point),
            expiration_date,
            unit_price: clamp_price(self.unit_price),
            category: self.category,
            form: self.form,
            location: self.location,
            id,
        })
    }
}

/// Convert a possibly-missing stored count to a non-negative integer.
fn clamp_count(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.floor().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

fn clamp_price(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_stock_value() {
        let mut med = Medicine::new("Amoxicillin 500mg".into(), date("2025-01-01"));
        med.quantity_on_hand = 3;
        med.unit_price = 25.5;
        assert!((med.stock_value() - 76.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_legacy_aliases() {
        let raw: RawMedicine = serde_json::from_str(
            r#"{"id": 42, "nombre": "Ibuprofeno", "stock_actual": 7, "stock_minimo": 10,
                "fecha_vencimiento": "2025-03-01", "precio": 1.25}"#,
        )
        .unwrap();

        let med = raw.normalize().unwrap();
        assert_eq!(med.id, "42");
        assert_eq!(med.name, "Ibuprofeno");
        assert_eq!(med.quantity_on_hand, 7);
        assert_eq!(med.reorder_point, 10);
        assert_eq!(med.expiration_date, date("2025-03-01"));
        assert_eq!(med.unit_price, 1.25);
    }

    #[test]
    fn test_normalize_camel_case() {
        let raw: RawMedicine = serde_json::from_str(
            r#"{"id": "abc", "name": "Paracetamol", "quantityOnHand": 12, "reorderPoint": 4,
                "expirationDate": "2025-06-30T15:45:00Z", "unitPrice": 0.5}"#,
        )
        .unwrap();

        let med = raw.normalize().unwrap();
        assert_eq!(med.id, "abc");
        assert_eq!(med.quantity_on_hand, 12);
        assert_eq!(med.expiration_date, date("2025-06-30"));
    }

    #[test]
    fn test_duplicate_spellings_take_first_key() {
        let raw: RawMedicine = serde_json::from_str(
            r#"{"id": 1, "name": "Aspirin", "nombre": "Aspirina", "quantity": 9,
                "stock_actual": 5, "expiration_date": "2025-01-01", "precio": null, "price": 2.0}"#,
        )
        .unwrap();

        let med = raw.normalize().unwrap();
        assert_eq!(med.name, "Aspirin");
        assert_eq!(med.quantity_on_hand, 5);
        assert_eq!(med.unit_price, 2.0);
    }

    #[test]
    fn test_wrong_type_names_the_field() {
        let err = serde_json::from_str::<RawMedicine>(
            r#"{"id": 1, "stock_actual": "lots", "expiration_date": "2025-01-01"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("stock_actual"));
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let raw = RawMedicine {
            id: Some(RawId::Text("m1".into())),
            name: Some("Saline".into()),
            expiration_date: Some("2025-01-01".into()),
            quantity_on_hand: Some(-4.0),
            unit_price: Some(f64::NAN),
            ..Default::default()
        };

        let med = raw.normalize().unwrap();
        assert_eq!(med.quantity_on_hand, 0);
        assert_eq!(med.reorder_point, 0);
        assert_eq!(med.unit_price, 0.0);
    }

    #[test]
    fn test_missing_date_is_rejected() {
        let raw = RawMedicine {
            id: Some(RawId::Int(1)),
            ..Default::default()
        };
        assert!(matches!(raw.normalize(), Err(EngineError::InvalidDate(_))));
    }

    #[test]
    fn test_garbage_date_is_rejected() {
        let raw = RawMedicine {
            id: Some(RawId::Int(1)),
            expiration_date: Some("not a date".into()),
            ..Default::default()
        };
        assert!(matches!(raw.normalize(), Err(EngineError::InvalidDate(_))));
    }
}
