//! Reference collections: the `(id, label)` options a card loads for
//! foreign-key selection and display-name lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kind::ResourceKind;
use crate::resource::Resource;

/// One selectable foreign-key target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub id: String,
    pub label: String,
}

impl ReferenceOption {
    pub fn from_record<R: Resource>(record: &R) -> Self {
        ReferenceOption {
            id: record.id().to_string(),
            label: record.label().to_string(),
        }
    }

    /// Build an option from an untyped record of collection `kind`.
    ///
    /// `None` when the record has no usable key. A missing name yields an
    /// empty label.
    pub fn from_json(kind: ResourceKind, record: &Value) -> Option<Self> {
        let id = match record.get(kind.key_field())? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let label = record
            .get(kind.display_field())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Some(ReferenceOption { id, label })
    }
}

/// Reference options keyed by the collection they were loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceSet {
    collections: BTreeMap<ResourceKind, Vec<ReferenceOption>>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ResourceKind, options: Vec<ReferenceOption>) {
        self.collections.insert(kind, options);
    }

    /// Options for `kind`; empty when the collection was never loaded.
    pub fn options(&self, kind: ResourceKind) -> &[ReferenceOption] {
        self.collections
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Display name of record `id` in collection `kind`, if loaded.
    pub fn label_of(&self, kind: ResourceKind, id: &str) -> Option<&str> {
        self.options(kind)
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }

    pub fn contains(&self, kind: ResourceKind, id: &str) -> bool {
        self.options(kind).iter().any(|o| o.id == id)
    }

    pub fn clear(&mut self) {
        self.collections.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.collections.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plants() -> ReferenceSet {
        let mut refs = ReferenceSet::new();
        refs.insert(
            ResourceKind::Plants,
            vec![
                ReferenceOption {
                    id: "p1".into(),
                    label: "North Works".into(),
                },
                ReferenceOption {
                    id: "p2".into(),
                    label: "South Works".into(),
                },
            ],
        );
        refs
    }

    #[test]
    fn label_lookup_by_kind_and_id() {
        let refs = plants();
        assert_eq!(refs.label_of(ResourceKind::Plants, "p2"), Some("South Works"));
        assert_eq!(refs.label_of(ResourceKind::Plants, "p9"), None);
        assert_eq!(refs.label_of(ResourceKind::Machines, "p1"), None);
    }

    #[test]
    fn options_from_untyped_records() {
        let user = serde_json::json!({"user_id": 4, "username": "jdoe", "email": "j@x"});
        assert_eq!(
            ReferenceOption::from_json(ResourceKind::Users, &user),
            Some(ReferenceOption {
                id: "4".into(),
                label: "jdoe".into()
            })
        );
        let keyless = serde_json::json!({"name": "Lathe"});
        assert_eq!(ReferenceOption::from_json(ResourceKind::Machines, &keyless), None);
    }

    #[test]
    fn unloaded_collection_is_empty_not_missing() {
        let refs = plants();
        assert!(refs.options(ResourceKind::Vendors).is_empty());
        assert!(!refs.is_empty());
        assert!(ReferenceSet::new().is_empty());
    }
}
