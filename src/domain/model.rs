use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One line of the roster CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub student_number: String,
    pub group_num: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupCategory {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    pub id: u64,
    pub group_id: u64,
    pub user_id: u64,
}

/// A course member as listed by Canvas. `sis_user_id` is the institutional
/// student number and is only visible to tokens with SIS read access.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasUser {
    pub id: u64,
    #[serde(default)]
    pub sis_user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// SIS user id to Canvas user id.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    ids: HashMap<String, u64>,
}

impl IdentifierMap {
    pub fn from_users(users: &[CanvasUser]) -> Self {
        let ids = users
            .iter()
            .filter_map(|user| user.sis_user_id.as_ref().map(|sis| (sis.clone(), user.id)))
            .collect();
        Self { ids }
    }

    pub fn lookup(&self, student_number: &str) -> Option<u64> {
        self.ids.get(student_number).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct GroupOutcome {
    pub group: Group,
    pub members_added: usize,
}

/// What a provisioning run created, plus the students it could not place.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub category: GroupCategory,
    pub groups: Vec<GroupOutcome>,
    pub unmatched: Vec<String>,
}

impl ProvisionReport {
    pub fn memberships_created(&self) -> usize {
        self.groups.iter().map(|g| g.members_added).sum()
    }
}
