use serde::{Deserialize, Serialize};

use crate::directory::Group;

/// Group overview entry. Access tokens never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub group_number: String,
    pub total_members: usize,
    pub members: Vec<MemberSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub name: String,
    pub workspace_name: String,
}

impl From<&Group> for GroupSummary {
    fn from(group: &Group) -> Self {
        Self {
            group_number: group.id.clone(),
            total_members: group.members.len(),
            members: group
                .members
                .iter()
                .map(|m| MemberSummary {
                    name: m.member_name.clone(),
                    workspace_name: m.workspace.clone(),
                })
                .collect(),
        }
    }
}
