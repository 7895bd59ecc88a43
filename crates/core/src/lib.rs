//! millwright-core: typed resource schemas and the synchronous half of the
//! resource-card pattern.
//!
//! Everything here is pure and I/O free:
//!
//! - [`ResourceKind`] -- the closed set of API collections and their paths
//! - [`Resource`] -- the schema trait every record type implements
//! - [`LocalStore`] -- ordered, key-unique in-memory record list
//! - [`filter`] -- the local/global search projection
//! - [`export`] -- CSV serialization of a projection
//! - [`stats`] -- work-order dashboard counters
//! - [`patch`] -- `key=value` edits of drafts and records
//!
//! The async fetch/mutate half lives in `millwright-card`.

pub mod export;
pub mod filter;
pub mod kind;
pub mod patch;
pub mod reference;
pub mod resource;
pub mod schema;
pub mod stats;
pub mod store;

pub use export::{to_csv, CsvExport};
pub use filter::{filter_records, matches_term};
pub use kind::{ParseKindError, ResourceKind};
pub use patch::{apply_assignments, merge_json, DraftError, FieldAssignment};
pub use reference::{ReferenceOption, ReferenceSet};
pub use resource::{Resource, SearchScope};
pub use schema::{
    InventoryItem, Machine, MaintenanceSchedule, NewInventoryItem, NewMachine,
    NewMaintenanceSchedule, NewPlant, NewUser, NewVendor, NewWorkOrder, Plant, Role, User, Vendor,
    WorkOrder,
};
pub use stats::WorkOrderStats;
pub use store::LocalStore;

/// Text rendered for a referenced record whose display name is unknown.
pub const NOT_AVAILABLE: &str = "N/A";
