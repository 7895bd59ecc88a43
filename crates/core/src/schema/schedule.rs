use serde::{Deserialize, Serialize};

use super::nullable_string;
use crate::kind::ResourceKind;
use crate::reference::ReferenceSet;
use crate::resource::{Resource, SearchScope};

/// Default interval for a new preventive-maintenance plan.
pub const DEFAULT_FREQUENCY_DAYS: u32 = 30;

/// A recurring preventive-maintenance plan for one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub schedule_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub machine_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default)]
    pub frequency_days: u32,
    #[serde(default)]
    pub last_completed: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub next_due: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewMaintenanceSchedule {
    pub machine_id: Option<String>,
    pub name: String,
    pub description: String,
    pub frequency_days: u32,
    pub last_completed: Option<String>,
    pub next_due: String,
}

impl Default for NewMaintenanceSchedule {
    fn default() -> Self {
        NewMaintenanceSchedule {
            machine_id: None,
            name: String::new(),
            description: String::new(),
            frequency_days: DEFAULT_FREQUENCY_DAYS,
            last_completed: None,
            next_due: String::new(),
        }
    }
}

impl Resource for MaintenanceSchedule {
    type Draft = NewMaintenanceSchedule;

    const KIND: ResourceKind = ResourceKind::MaintenanceSchedules;

    fn id(&self) -> &str {
        &self.schedule_id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self, _scope: SearchScope) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    /// The machine column holds the machine's name when the loaded machine
    /// options resolve `machine_id`, and the raw `machine_id` otherwise, so
    /// exports taken without references keep the plain id column.
    fn csv_row(&self, refs: &ReferenceSet) -> Vec<String> {
        let machine = refs
            .label_of(ResourceKind::Machines, &self.machine_id)
            .unwrap_or(&self.machine_id);
        vec![
            self.name.clone(),
            self.description.clone(),
            self.frequency_days.to_string(),
            self.last_completed.clone().unwrap_or_default(),
            self.next_due.clone(),
            machine.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceOption;

    fn lubrication() -> MaintenanceSchedule {
        MaintenanceSchedule {
            schedule_id: "s1".into(),
            machine_id: "m7".into(),
            name: "Lubrication".into(),
            description: "Grease bearings".into(),
            frequency_days: 14,
            last_completed: None,
            next_due: "2025-02-01".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn csv_uses_machine_id_when_unresolved() {
        assert_eq!(
            lubrication().csv_row(&ReferenceSet::new()),
            vec!["Lubrication", "Grease bearings", "14", "", "2025-02-01", "m7"]
        );
    }

    #[test]
    fn csv_resolves_machine_name_when_loaded() {
        let mut refs = ReferenceSet::new();
        refs.insert(
            ResourceKind::Machines,
            vec![ReferenceOption {
                id: "m7".into(),
                label: "Press 7".into(),
            }],
        );
        assert_eq!(lubrication().csv_row(&refs)[5], "Press 7");
    }
}
