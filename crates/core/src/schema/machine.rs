use serde::{Deserialize, Serialize};

use super::{nullable_string, resolve_name, PlantRef};
use crate::kind::ResourceKind;
use crate::reference::ReferenceSet;
use crate::resource::{Resource, SearchScope};

/// A piece of equipment installed at a plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub machine_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub model: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub manufacturer: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub serial_number: String,
    #[serde(default)]
    pub plant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant: Option<PlantRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewMachine {
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub serial_number: String,
    pub plant_id: Option<String>,
}

impl Resource for Machine {
    type Draft = NewMachine;

    const KIND: ResourceKind = ResourceKind::Machines;

    fn id(&self) -> &str {
        &self.machine_id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self, scope: SearchScope) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.serial_number.as_str(),
            self.model.as_str(),
            self.manufacturer.as_str(),
        ];
        if scope == SearchScope::Global {
            if let Some(plant) = &self.plant {
                fields.push(&plant.name);
            }
        }
        fields
    }

    fn csv_row(&self, refs: &ReferenceSet) -> Vec<String> {
        vec![
            self.name.clone(),
            self.model.clone(),
            self.manufacturer.clone(),
            self.serial_number.clone(),
            resolve_name(
                self.plant.as_ref().map(|p| p.name.as_str()),
                refs,
                ResourceKind::Plants,
                self.plant_id.as_deref(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceOption;

    #[test]
    fn decodes_null_text_fields_as_empty() {
        let machine: Machine = serde_json::from_value(serde_json::json!({
            "machine_id": "m1",
            "name": "Lathe",
            "model": null,
            "manufacturer": "Acme",
            "serial_number": "SN-1",
            "plant_id": null,
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(machine.model, "");
        assert_eq!(machine.plant_id, None);
    }

    #[test]
    fn csv_plant_resolved_from_references() {
        let machine = Machine {
            machine_id: "m1".into(),
            name: "Lathe".into(),
            model: "L-200".into(),
            manufacturer: "Acme".into(),
            serial_number: "SN-1".into(),
            plant_id: Some("p1".into()),
            plant: None,
        };
        let mut refs = ReferenceSet::new();
        refs.insert(
            ResourceKind::Plants,
            vec![ReferenceOption {
                id: "p1".into(),
                label: "North Works".into(),
            }],
        );
        assert_eq!(
            machine.csv_row(&refs),
            vec!["Lathe", "L-200", "Acme", "SN-1", "North Works"]
        );
        assert_eq!(machine.csv_row(&ReferenceSet::new())[4], "N/A");
    }
}
