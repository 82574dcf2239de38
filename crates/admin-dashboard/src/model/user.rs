use super::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

/// A back-office account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub organization_id: String,
    pub created_at: u64,
}

#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub organization_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl Record for User {
    type Create = UserCreate;
    type Update = UserUpdate;

    const TABLE: &'static str = "users";

    fn id(&self) -> u32 {
        self.id
    }

    fn from_create(id: u32, created_at: u64, params: UserCreate) -> Self {
        Self {
            id,
            name: params.name,
            email: params.email,
            role: params.role,
            active: true,
            organization_id: params.organization_id,
            created_at,
        }
    }

    fn apply_update(&mut self, update: UserUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
    }
}
