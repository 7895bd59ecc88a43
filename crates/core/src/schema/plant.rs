use serde::{Deserialize, Serialize};

use super::nullable_string;
use crate::kind::ResourceKind;
use crate::reference::ReferenceSet;
use crate::resource::{Resource, SearchScope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub plant_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub contact_email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub contact_phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPlant {
    pub name: String,
    pub location: String,
    pub contact_email: String,
    pub contact_phone: String,
}

impl Resource for Plant {
    type Draft = NewPlant;

    const KIND: ResourceKind = ResourceKind::Plants;

    fn id(&self) -> &str {
        &self.plant_id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self, scope: SearchScope) -> Vec<&str> {
        match scope {
            SearchScope::Local => vec![self.name.as_str(), self.location.as_str()],
            SearchScope::Global => vec![
                self.name.as_str(),
                self.location.as_str(),
                self.contact_email.as_str(),
            ],
        }
    }

    fn csv_row(&self, _refs: &ReferenceSet) -> Vec<String> {
        vec![
            self.name.clone(),
            self.location.clone(),
            self.contact_email.clone(),
            self.contact_phone.clone(),
        ]
    }
}
