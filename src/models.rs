use crate::error::{TrackerError, TrackerResult};
use serde::{Deserialize, Serialize};

fn default_stack_size() -> u32 {
    1
}

fn default_weight() -> f64 {
    1.0
}

/// A tracked game item. Price metrics are derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
    #[serde(default = "default_weight")]
    pub weight_per_item: f64,
    /// Filesystem path to the item's icon; empty means no icon
    #[serde(default)]
    pub icon_path: String,
}

impl Item {
    /// Create a validated item. Rejects a non-positive stack size or weight
    /// and a negative or non-finite unit price.
    pub fn new(
        name: impl Into<String>,
        unit_price: f64,
        stack_size: u32,
        weight_per_item: f64,
        icon_path: impl Into<String>,
    ) -> TrackerResult<Self> {
        let item = Item {
            name: name.into(),
            unit_price,
            stack_size,
            weight_per_item,
            icon_path: icon_path.into(),
        };
        item.validate()?;
        Ok(item)
    }

    /// Re-check the numeric invariants. Items deserialized from disk bypass
    /// `new`, so the store runs this on every write candidate.
    pub fn validate(&self) -> TrackerResult<()> {
        if self.stack_size == 0 {
            return Err(TrackerError::Validation(
                "stack size must be greater than zero".to_string(),
            ));
        }
        if !(self.weight_per_item > 0.0) || !self.weight_per_item.is_finite() {
            return Err(TrackerError::Validation(
                "weight per item must be greater than zero".to_string(),
            ));
        }
        if !(self.unit_price >= 0.0) || !self.unit_price.is_finite() {
            return Err(TrackerError::Validation(
                "unit price must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Price of a full stack: `unit_price * stack_size`
    pub fn price_per_stack(&self) -> f64 {
        if self.stack_size > 0 {
            self.unit_price * self.stack_size as f64
        } else {
            0.0
        }
    }

    /// Price per kilogram: `unit_price / weight_per_item`
    pub fn price_per_kg(&self) -> f64 {
        if self.weight_per_item > 0.0 {
            self.unit_price / self.weight_per_item
        } else {
            0.0
        }
    }

    /// Returns true if the item references an icon file
    pub fn has_icon(&self) -> bool {
        !self.icon_path.trim().is_empty()
    }
}
