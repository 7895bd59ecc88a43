use serde::{Deserialize, Serialize};

use super::{nullable_string, resolve_name, InventoryRef, MachineRef, PlantRef, UserRef};
use crate::kind::ResourceKind;
use crate::reference::ReferenceSet;
use crate::resource::{Resource, SearchScope};

/// A unit of maintenance work, optionally tied to a machine, a plant and an
/// assignee.
///
/// List responses embed the related machine/plant/user plus the parts and
/// labor booked against the order; these are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub work_order_id: String,
    #[serde(default)]
    pub machine_id: Option<String>,
    #[serde(default)]
    pub plant_id: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub priority: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<MachineRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant: Option<PlantRef>,
    #[serde(
        rename = "assignedUser",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_user: Option<UserRef>,
    #[serde(rename = "workOrderParts", default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<WorkOrderPart>,
    #[serde(rename = "workOrderLabor", default, skip_serializing_if = "Vec::is_empty")]
    pub labor: Vec<WorkOrderLabor>,
}

/// Inventory consumed by a work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderPart {
    pub work_order_part_id: String,
    pub inventory_id: String,
    #[serde(default)]
    pub quantity_used: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryRef>,
}

/// Hours booked against a work order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderLabor {
    pub work_order_labor_id: String,
    pub user_id: String,
    #[serde(default)]
    pub hours_worked: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewWorkOrder {
    pub machine_id: Option<String>,
    pub plant_id: Option<String>,
    pub assigned_to: Option<String>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: String,
}

impl Default for NewWorkOrder {
    fn default() -> Self {
        NewWorkOrder {
            machine_id: None,
            plant_id: None,
            assigned_to: None,
            title: String::new(),
            description: String::new(),
            status: "pending".to_string(),
            priority: "medium".to_string(),
            due_date: String::new(),
        }
    }
}

impl WorkOrder {
    pub fn machine_name(&self, refs: &ReferenceSet) -> String {
        resolve_name(
            self.machine.as_ref().map(|m| m.name.as_str()),
            refs,
            ResourceKind::Machines,
            self.machine_id.as_deref(),
        )
    }

    pub fn plant_name(&self, refs: &ReferenceSet) -> String {
        resolve_name(
            self.plant.as_ref().map(|p| p.name.as_str()),
            refs,
            ResourceKind::Plants,
            self.plant_id.as_deref(),
        )
    }

    pub fn assignee_name(&self, refs: &ReferenceSet) -> String {
        resolve_name(
            self.assigned_user.as_ref().map(|u| u.username.as_str()),
            refs,
            ResourceKind::Users,
            self.assigned_to.as_deref(),
        )
    }
}

impl Resource for WorkOrder {
    type Draft = NewWorkOrder;

    const KIND: ResourceKind = ResourceKind::WorkOrders;

    fn id(&self) -> &str {
        &self.work_order_id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn search_fields(&self, scope: SearchScope) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        if scope == SearchScope::Global {
            fields.push(self.machine.as_ref().map(|m| m.name.as_str()).unwrap_or(""));
            fields.push(self.plant.as_ref().map(|p| p.name.as_str()).unwrap_or(""));
            fields.push(
                self.assigned_user
                    .as_ref()
                    .map(|u| u.username.as_str())
                    .unwrap_or(""),
            );
        }
        fields
    }

    fn csv_row(&self, refs: &ReferenceSet) -> Vec<String> {
        vec![
            self.title.clone(),
            self.description.clone(),
            self.status.clone(),
            self.priority.clone(),
            self.due_date.clone(),
            self.machine_name(refs),
            self.plant_name(refs),
            self.assignee_name(refs),
        ]
    }

    /// Parts consumed and hours booked, one entry per line.
    fn details(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.parts.is_empty() {
            lines.push("Parts used:".to_string());
            for part in &self.parts {
                let name = part
                    .inventory
                    .as_ref()
                    .map(|i| i.name.as_str())
                    .unwrap_or(part.inventory_id.as_str());
                lines.push(format!("  {} x {}", name, part.quantity_used));
            }
        }
        if !self.labor.is_empty() {
            lines.push("Labor:".to_string());
            for entry in &self.labor {
                let who = entry
                    .user
                    .as_ref()
                    .map(|u| u.username.as_str())
                    .unwrap_or(entry.user_id.as_str());
                lines.push(format!("  {}: {} h", who, entry.hours_worked));
            }
            let total: f64 = self.labor.iter().map(|l| l.hours_worked).sum();
            lines.push(format!("  Total: {} h", total));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "work_order_id": "wo1",
            "machine_id": "m1",
            "plant_id": null,
            "assigned_to": "u1",
            "title": "Replace belt",
            "description": "Conveyor belt worn",
            "status": "in-progress",
            "priority": "high",
            "due_date": "2025-03-01",
            "machine": { "machine_id": "m1", "name": "Conveyor 3" },
            "assignedUser": { "user_id": "u1", "username": "jdoe" },
            "workOrderParts": [{
                "work_order_part_id": "wp1",
                "inventory_id": "i1",
                "quantity_used": 2,
                "inventory": { "inventory_id": "i1", "name": "Belt" }
            }],
            "workOrderLabor": []
        })
    }

    #[test]
    fn decodes_embedded_relations() {
        let wo: WorkOrder = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(wo.machine.as_ref().unwrap().name, "Conveyor 3");
        assert_eq!(wo.assigned_user.as_ref().unwrap().username, "jdoe");
        assert_eq!(wo.parts.len(), 1);
        assert_eq!(wo.parts[0].quantity_used, 2);
        assert!(wo.labor.is_empty());
    }

    #[test]
    fn csv_row_falls_back_to_na_for_missing_plant() {
        let wo: WorkOrder = serde_json::from_value(sample_json()).unwrap();
        let row = wo.csv_row(&ReferenceSet::new());
        assert_eq!(row[5], "Conveyor 3");
        assert_eq!(row[6], "N/A");
        assert_eq!(row[7], "jdoe");
        assert_eq!(row.len(), ResourceKind::WorkOrders.csv_header().len());
    }

    #[test]
    fn local_search_ignores_related_names() {
        let wo: WorkOrder = serde_json::from_value(sample_json()).unwrap();
        assert!(!wo.search_fields(SearchScope::Local).contains(&"Conveyor 3"));
        assert!(wo.search_fields(SearchScope::Global).contains(&"Conveyor 3"));
    }

    #[test]
    fn details_list_parts_and_labor() {
        let mut wo: WorkOrder = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(wo.details(), vec!["Parts used:", "  Belt x 2"]);

        wo.labor = serde_json::from_value(serde_json::json!([
            { "work_order_labor_id": "l1", "user_id": "u1", "hours_worked": 1.5,
              "user": { "user_id": "u1", "username": "jdoe" } },
            { "work_order_labor_id": "l2", "user_id": "u9", "hours_worked": 2.0 }
        ]))
        .unwrap();
        wo.parts.clear();
        assert_eq!(
            wo.details(),
            vec!["Labor:", "  jdoe: 1.5 h", "  u9: 2 h", "  Total: 3.5 h"]
        );
    }

    #[test]
    fn draft_defaults_match_creation_form() {
        let draft = NewWorkOrder::default();
        assert_eq!(draft.status, "pending");
        assert_eq!(draft.priority, "medium");
        assert!(draft.machine_id.is_none());
    }
}
