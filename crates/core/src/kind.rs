//! The closed set of resource collections exposed by the maintenance API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One REST collection under `/api/<path>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Machines,
    Plants,
    Vendors,
    Users,
    WorkOrders,
    MaintenanceSchedules,
    Inventory,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Machines,
        ResourceKind::Plants,
        ResourceKind::Vendors,
        ResourceKind::Users,
        ResourceKind::WorkOrders,
        ResourceKind::MaintenanceSchedules,
        ResourceKind::Inventory,
    ];

    /// URL path segment below `/api/`.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Machines => "machines",
            ResourceKind::Plants => "plants",
            ResourceKind::Vendors => "vendors",
            ResourceKind::Users => "users",
            ResourceKind::WorkOrders => "work-orders",
            ResourceKind::MaintenanceSchedules => "maintenance-schedules",
            ResourceKind::Inventory => "inventory",
        }
    }

    /// Name of the primary-key field in the JSON representation.
    pub fn key_field(self) -> &'static str {
        match self {
            ResourceKind::Machines => "machine_id",
            ResourceKind::Plants => "plant_id",
            ResourceKind::Vendors => "vendor_id",
            ResourceKind::Users => "user_id",
            ResourceKind::WorkOrders => "work_order_id",
            ResourceKind::MaintenanceSchedules => "schedule_id",
            ResourceKind::Inventory => "inventory_id",
        }
    }

    /// Field holding the human-readable name offered in reference pickers.
    pub fn display_field(self) -> &'static str {
        match self {
            ResourceKind::Users => "username",
            ResourceKind::WorkOrders => "title",
            _ => "name",
        }
    }

    /// Singular, lower-case noun used in notifications ("Failed to add machine").
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Machines => "machine",
            ResourceKind::Plants => "plant",
            ResourceKind::Vendors => "vendor",
            ResourceKind::Users => "user",
            ResourceKind::WorkOrders => "work order",
            ResourceKind::MaintenanceSchedules => "maintenance schedule",
            ResourceKind::Inventory => "inventory item",
        }
    }

    /// [`label`](Self::label) with the first letter upper-cased.
    pub fn title(self) -> String {
        let label = self.label();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Collections a card of this kind loads alongside its own, for
    /// foreign-key selection and name resolution.
    pub fn references(self) -> &'static [ResourceKind] {
        match self {
            ResourceKind::Machines => &[ResourceKind::Plants],
            ResourceKind::Plants | ResourceKind::Vendors => &[],
            ResourceKind::Users => &[ResourceKind::Plants],
            ResourceKind::WorkOrders => &[
                ResourceKind::Machines,
                ResourceKind::Plants,
                ResourceKind::Users,
            ],
            ResourceKind::MaintenanceSchedules => &[ResourceKind::Machines],
            ResourceKind::Inventory => &[ResourceKind::Plants, ResourceKind::Vendors],
        }
    }

    /// Fixed CSV header row for exports of this kind.
    pub fn csv_header(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Machines => &["Name", "Model", "Manufacturer", "Serial Number", "Plant"],
            ResourceKind::Plants => &["Name", "Location", "Contact Email", "Contact Phone"],
            ResourceKind::Vendors => &["Name", "Contact Email", "Contact Phone", "Address"],
            ResourceKind::Users => &["Username", "Email", "Role", "Plant"],
            ResourceKind::WorkOrders => &[
                "Title",
                "Description",
                "Status",
                "Priority",
                "Due Date",
                "Machine",
                "Plant",
                "Assigned To",
            ],
            ResourceKind::MaintenanceSchedules => &[
                "Name",
                "Description",
                "Frequency (Days)",
                "Last Completed",
                "Next Due",
                "Machine",
            ],
            ResourceKind::Inventory => &[
                "Name",
                "Description",
                "Quantity",
                "Unit Price",
                "Plant",
                "Vendor",
            ],
        }
    }

    /// File name offered for a CSV export.
    pub fn csv_file_name(self) -> &'static str {
        match self {
            ResourceKind::Machines => "machines.csv",
            ResourceKind::Plants => "plants.csv",
            ResourceKind::Vendors => "vendors.csv",
            ResourceKind::Users => "users.csv",
            ResourceKind::WorkOrders => "work_orders.csv",
            ResourceKind::MaintenanceSchedules => "maintenance_schedules.csv",
            ResourceKind::Inventory => "inventory.csv",
        }
    }

    /// Look a kind up by its URL path segment.
    pub fn from_path(path: &str) -> Option<ResourceKind> {
        ResourceKind::ALL.into_iter().find(|k| k.path() == path)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Returned when a string names no known resource collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource '{0}' (expected one of: machines, plants, vendors, users, work-orders, maintenance-schedules, inventory)")]
pub struct ParseKindError(pub String);

impl FromStr for ResourceKind {
    type Err = ParseKindError;

    /// Accepts the URL path and the snake_case spelling (`work_orders`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ResourceKind::from_path(&normalized).ok_or_else(|| ParseKindError(s.to_string()))
    }
}
