use std::fmt;

use serde::{Deserialize, Serialize};

use super::{nullable_string, resolve_name, PlantRef};
use crate::kind::ResourceKind;
use crate::reference::ReferenceSet;
use crate::resource::{Resource, SearchScope};

/// Access role assigned to an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Technician,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Technician => "technician",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub username: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub plant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant: Option<PlantRef>,
}

/// Account creation form. The password is only ever sent, never read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub plant_id: Option<String>,
}

impl Resource for User {
    type Draft = NewUser;

    const KIND: ResourceKind = ResourceKind::Users;

    fn id(&self) -> &str {
        &self.user_id
    }

    fn label(&self) -> &str {
        &self.username
    }

    fn search_fields(&self, scope: SearchScope) -> Vec<&str> {
        let mut fields = vec![self.username.as_str(), self.email.as_str()];
        if scope == SearchScope::Global {
            fields.push(self.role.as_str());
            fields.push(self.plant.as_ref().map(|p| p.name.as_str()).unwrap_or(""));
        }
        fields
    }

    fn csv_row(&self, refs: &ReferenceSet) -> Vec<String> {
        vec![
            self.username.clone(),
            self.email.clone(),
            self.role.to_string(),
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

    #[test]
    fn new_user_defaults_to_technician() {
        let draft = NewUser::default();
        assert_eq!(draft.role, Role::Technician);
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["role"], "technician");
        assert_eq!(json["plant_id"], serde_json::Value::Null);
    }

    #[test]
    fn global_search_covers_role_and_plant() {
        let user = User {
            user_id: "u1".into(),
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            role: Role::Manager,
            plant_id: Some("p1".into()),
            plant: Some(PlantRef {
                plant_id: "p1".into(),
                name: "North Works".into(),
            }),
        };
        assert_eq!(user.search_fields(SearchScope::Local).len(), 2);
        let global = user.search_fields(SearchScope::Global);
        assert!(global.contains(&"manager"));
        assert!(global.contains(&"North Works"));
    }
}
