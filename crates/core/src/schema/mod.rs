//! Typed schemas for every API collection.
//!
//! Field names follow the API's snake_case JSON. Related records the server
//! embeds in list responses (a work order's machine, a user's plant) are
//! modelled as optional `*Ref` structs and never sent back on create.

mod inventory;
mod machine;
mod plant;
mod schedule;
mod user;
mod vendor;
mod work_order;

use serde::{Deserialize, Deserializer, Serialize};

pub use inventory::{InventoryItem, NewInventoryItem};
pub use machine::{Machine, NewMachine};
pub use plant::{NewPlant, Plant};
pub use schedule::{MaintenanceSchedule, NewMaintenanceSchedule};
pub use user::{NewUser, Role, User};
pub use vendor::{NewVendor, Vendor};
pub use work_order::{NewWorkOrder, WorkOrder, WorkOrderLabor, WorkOrderPart};

use crate::kind::ResourceKind;
use crate::reference::ReferenceSet;
use crate::NOT_AVAILABLE;

/// Embedded `{machine_id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRef {
    pub machine_id: String,
    pub name: String,
}

/// Embedded `{plant_id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRef {
    pub plant_id: String,
    pub name: String,
}

/// Embedded `{vendor_id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRef {
    pub vendor_id: String,
    pub name: String,
}

/// Embedded `{user_id, username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub user_id: String,
    pub username: String,
}

/// Embedded `{inventory_id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRef {
    pub inventory_id: String,
    pub name: String,
}

/// Treat a JSON `null` text field as the empty string.
pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Display name for a foreign key: the embedded name when the server sent
/// one, else the loaded reference label, else `N/A`.
pub(crate) fn resolve_name(
    embedded: Option<&str>,
    refs: &ReferenceSet,
    kind: ResourceKind,
    id: Option<&str>,
) -> String {
    embedded
        .or_else(|| id.and_then(|id| refs.label_of(kind, id)))
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}
