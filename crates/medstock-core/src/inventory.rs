//! Datastore boundary.
//!
//! Records enter the engine here. Each one is normalized once into a
//! canonical [`Medicine`]; records that cannot be normalized are reported
//! back instead of aborting the rest of the load.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::models::{Medicine, RawMedicine};

/// A record that could not be turned into a [`Medicine`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectedRecord {
    /// Position in the source collection
    pub index: usize,
    /// Record id, when one could be read
    pub id: Option<String>,
    pub reason: String,
}

/// Result of loading an inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryLoad {
    pub medicines: Vec<Medicine>,
    pub rejected: Vec<RejectedRecord>,
}

impl InventoryLoad {
    /// Normalize a sequence of raw records.
    pub fn from_raw<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RawMedicine>,
    {
        let mut load = Self::default();
        for (index, raw) in records.into_iter().enumerate() {
            let id = raw.id.as_ref().map(|id| id.to_string());
            match raw.normalize() {
                Ok(medicine) => load.medicines.push(medicine),
                Err(e) => load.rejected.push(RejectedRecord {
                    index,
                    id,
                    reason: e.to_string(),
                }),
            }
        }
        load
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Read-only supplier of medicines.
pub trait MedicineSource {
    type Error;

    /// List every medicine in canonical shape.
    fn list_medicines(&self) -> Result<InventoryLoad, Self::Error>;
}

impl MedicineSource for Vec<Medicine> {
    type Error = std::convert::Infallible;

    fn list_medicines(&self) -> Result<InventoryLoad, Self::Error> {
        Ok(InventoryLoad {
            medicines: self.clone(),
            rejected: Vec::new(),
        })
    }
}

/// Parse a serialized inventory.
///
/// Accepts a JSON array of records or an object with a `medicines` array.
/// A null (or missing) collection is a caller error.
pub fn parse_inventory_json(json: &str) -> EngineResult<InventoryLoad> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| EngineError::InvalidArgument(format!("inventory is not valid JSON: {}", e)))?;

    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("medicines") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => {
                return Err(EngineError::InvalidArgument(
                    "medicine collection is null".into(),
                ))
            }
            Some(other) => {
                return Err(EngineError::InvalidArgument(format!(
                    "medicines must be an array, got {}",
                    json_type(&other)
                )))
            }
        },
        Value::Null => {
            return Err(EngineError::InvalidArgument(
                "medicine collection is null".into(),
            ))
        }
        other => {
            return Err(EngineError::InvalidArgument(format!(
                "expected an array of medicines, got {}",
                json_type(&other)
            )))
        }
    };

    let mut load = InventoryLoad::default();
    for (index, record) in records.into_iter().enumerate() {
        let id = record.get("id").and_then(id_of);
        let normalized = serde_json::from_value::<RawMedicine>(record)
            .map_err(|e| EngineError::InvalidArgument(e.to_string()))
            .and_then(RawMedicine::normalize);

        match normalized {
            Ok(medicine) => load.medicines.push(medicine),
            Err(e) => load.rejected.push(RejectedRecord {
                index,
                id,
                reason: e.to_string(),
            }),
        }
    }

    Ok(load)
}

fn id_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
