use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{Identity, RoleSet};
use crate::store::{RecordStore, Repository};

pub struct RoleResolver;

impl RoleResolver {
    /// Role flags for `identity`, read from `user_roles`.
    ///
    /// Fails closed: no identity or a failed lookup yields no roles.
    pub async fn resolve(store: Arc<dyn RecordStore>, identity: Option<&Identity>) -> RoleSet {
        let Some(identity) = identity else {
            return RoleSet::default();
        };

        match Repository::new(store).roles_for(identity.id).await {
            Ok(roles) => {
                let set = RoleSet::from_roles(roles);
                debug!("Resolved roles for {}: {:?}", identity.id, set);
                set
            }
            Err(e) => {
                warn!("Role lookup failed for {}, denying gated access: {}", identity.id, e);
                RoleSet::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Collection, MemoryStore};
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn resolves_owner_and_admin_flags() {
        let store = MemoryStore::new();
        let who = Identity::new(Uuid::new_v4(), None);
        store
            .seed(
                Collection::UserRoles,
                vec![
                    json!({ "user_id": who.id.to_string(), "role": "owner" }),
                    json!({ "user_id": who.id.to_string(), "role": "admin" }),
                ],
            )
            .await;

        let roles = RoleResolver::resolve(Arc::new(store), Some(&who)).await;
        assert_eq!(roles, RoleSet { owner: true, admin: true });
    }

    #[tokio::test]
    async fn failed_lookup_fails_closed() {
        let store = MemoryStore::new();
        let who = Identity::new(Uuid::new_v4(), None);
        store
            .seed(
                Collection::UserRoles,
                vec![json!({ "user_id": who.id.to_string(), "role": "admin" })],
            )
            .await;
        store.fail(Collection::UserRoles).await;

        let roles = RoleResolver::resolve(Arc::new(store), Some(&who)).await;
        assert_eq!(roles, RoleSet::default());
    }

    #[tokio::test]
    async fn no_identity_means_no_roles() {
        let roles = RoleResolver::resolve(Arc::new(MemoryStore::new()), None).await;
        assert_eq!(roles, RoleSet::default());
    }
}
