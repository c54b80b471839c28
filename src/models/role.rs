use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Capability grants stored in `user_roles`. Tenant is implicit for every
/// identity and never gates anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tenant,
    Owner,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tenant" => Ok(Role::Tenant),
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub user_id: Uuid,
    pub role: Role,
}

/// Derived capability flags for one identity. The default is the
/// fail-closed value: no gated capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    pub owner: bool,
    pub admin: bool,
}

impl RoleSet {
    pub fn from_roles<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        roles.into_iter().fold(Self::default(), |mut set, role| {
            match role {
                Role::Owner => set.owner = true,
                Role::Admin => set.admin = true,
                Role::Tenant => {}
            }
            set
        })
    }

    pub fn has(&self, role: Role) -> bool {
        match role {
            Role::Tenant => true,
            Role::Owner => self.owner,
            Role::Admin => self.admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_assignments_merge() {
        let set = RoleSet::from_roles([Role::Tenant, Role::Admin, Role::Owner]);
        assert!(set.owner);
        assert!(set.admin);
    }

    #[test]
    fn tenant_alone_grants_nothing_gated() {
        let set = RoleSet::from_roles([Role::Tenant]);
        assert_eq!(set, RoleSet::default());
        assert!(set.has(Role::Tenant));
        assert!(!set.has(Role::Owner));
    }

    #[test]
    fn role_names_are_lowercase_on_the_wire() {
        let parsed: Role = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(parsed, Role::Owner);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
