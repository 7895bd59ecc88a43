use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{nullable_string, resolve_name, PlantRef, VendorRef};
use crate::kind::ResourceKind;
use crate::reference::ReferenceSet;
use crate::resource::{Resource, SearchScope};

/// A stocked spare part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub inventory_id: String,
    #[serde(default)]
    pub plant_id: Option<String>,
    #[serde(default)]
    pub vendor_id: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant: Option<PlantRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<VendorRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewInventoryItem {
    pub plant_id: Option<String>,
    pub vendor_id: Option<String>,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl Resource for InventoryItem {
    type Draft = NewInventoryItem;

    const KIND: ResourceKind = ResourceKind::Inventory;

    fn id(&self) -> &str {
        &self.inventory_id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self, scope: SearchScope) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        if scope == SearchScope::Global {
            fields.push(self.plant.as_ref().map(|p| p.name.as_str()).unwrap_or(""));
            fields.push(self.vendor.as_ref().map(|v| v.name.as_str()).unwrap_or(""));
        }
        fields
    }

    fn csv_row(&self, refs: &ReferenceSet) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.quantity.to_string(),
            format!("{:.2}", self.unit_price),
            resolve_name(
                self.plant.as_ref().map(|p| p.name.as_str()),
                refs,
                ResourceKind::Plants,
                self.plant_id.as_deref(),
            ),
            resolve_name(
                self.vendor.as_ref().map(|v| v.name.as_str()),
                refs,
                ResourceKind::Vendors,
                self.vendor_id.as_deref(),
            ),
        ]
    }
}
