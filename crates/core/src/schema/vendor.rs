use serde::{Deserialize, Serialize};

use super::nullable_string;
use crate::kind::ResourceKind;
use crate::reference::ReferenceSet;
use crate::resource::{Resource, SearchScope};

/// A parts or service supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub vendor_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub contact_email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub contact_phone: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewVendor {
    pub name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
}

impl Resource for Vendor {
    type Draft = NewVendor;

    const KIND: ResourceKind = ResourceKind::Vendors;

    fn id(&self) -> &str {
        &self.vendor_id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self, scope: SearchScope) -> Vec<&str> {
        match scope {
            SearchScope::Local => vec![self.name.as_str(), self.contact_email.as_str()],
            SearchScope::Global => vec![
                self.name.as_str(),
                self.contact_email.as_str(),
                self.address.as_str(),
            ],
        }
    }

    fn csv_row(&self, _refs: &ReferenceSet) -> Vec<String> {
        vec![
            self.name.clone(),
            self.contact_email.clone(),
            self.contact_phone.clone(),
            self.address.clone(),
        ]
    }
}
