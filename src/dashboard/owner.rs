use uuid::Uuid;

use super::DashboardView;
use crate::listing::{submit_draft, ConfirmedDelete, FormError, PropertyDraft};
use crate::models::{Identity, Listing, Role};
use crate::session::{AccessError, SessionState};
use crate::store::Repository;

pub const LOAD_FAILED: &str = "Failed to load properties";

/// The signed-in owner's own listings, newest first.
pub struct OwnerDashboard {
    repo: Repository,
    owner: Identity,
    view: DashboardView<Vec<Listing>>,
}

impl OwnerDashboard {
    /// Checks the owner role. Nothing is fetched yet; the view is loading.
    pub fn new(repo: Repository, state: &SessionState) -> Result<Self, AccessError> {
        let owner = state.require(Role::Owner)?.clone();
        Ok(Self {
            repo,
            owner,
            view: DashboardView::loading(),
        })
    }

    /// Checks the owner role, then loads.
    pub async fn open(repo: Repository, state: &SessionState) -> Result<Self, AccessError> {
        let mut dashboard = Self::new(repo, state)?;
        dashboard.refresh().await;
        Ok(dashboard)
    }

    pub async fn refresh(&mut self) {
        let result = self.repo.listings_by_owner(self.owner.id).await;
        self.view.settle(result, LOAD_FAILED);
    }

    pub fn view(&self) -> &DashboardView<Vec<Listing>> {
        &self.view
    }

    pub fn into_view(self) -> DashboardView<Vec<Listing>> {
        self.view
    }

    /// Creates a listing, or updates `editing`, then reloads.
    pub async fn save(
        &mut self,
        editing: Option<Uuid>,
        draft: &PropertyDraft,
    ) -> Result<Listing, FormError> {
        let listing = submit_draft(&self.repo, &self.owner, editing, draft).await?;
        self.refresh().await;
        Ok(listing)
    }

    /// Deletes a confirmed listing and reloads. On failure the view is left
    /// as it was.
    pub async fn delete(&mut self, request: ConfirmedDelete) -> Result<(), FormError> {
        request.execute_as_owner(&self.repo, &self.owner).await?;
        self.refresh().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::ViewState;
    use crate::listing::DeleteRequest;
    use crate::models::RoleSet;
    use crate::store::{Collection, MemoryStore};
    use std::sync::Arc;

    fn owner_state() -> SessionState {
        SessionState::signed_in(
            Identity::new(Uuid::new_v4(), None),
            RoleSet { owner: true, admin: false },
        )
    }

    fn draft(title: &str) -> PropertyDraft {
        PropertyDraft {
            title: title.to_string(),
            location: "Pune".to_string(),
            rent: "9000".to_string(),
            description: "Two rooms".to_string(),
            ..PropertyDraft::default()
        }
    }

    #[tokio::test]
    async fn tenant_is_denied_before_any_fetch() {
        let store = MemoryStore::new();
        store.fail(Collection::Properties).await;
        let state = SessionState::signed_in(Identity::new(Uuid::new_v4(), None), RoleSet::default());

        let result = OwnerDashboard::open(Repository::new(Arc::new(store)), &state).await;
        assert_eq!(result.err(), Some(AccessError::Denied(Role::Owner)));
    }

    #[tokio::test]
    async fn save_and_delete_reload_the_list() {
        let store = MemoryStore::new();
        let mut dashboard = OwnerDashboard::open(Repository::new(Arc::new(store)), &owner_state())
            .await
            .unwrap();
        assert_eq!(dashboard.view().state, ViewState::ReadyEmpty);

        let first = dashboard.save(None, &draft("First")).await.unwrap();
        dashboard.save(None, &draft("Second")).await.unwrap();
        assert_eq!(dashboard.view().data.len(), 2);
        assert_eq!(dashboard.view().state, ViewState::Ready);

        dashboard
            .delete(DeleteRequest::new(first.id).confirm())
            .await
            .unwrap();
        let titles: Vec<_> = dashboard.view().data.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Second"]);
    }

    #[tokio::test]
    async fn load_failure_shows_notice() {
        let store = MemoryStore::new();
        store.fail(Collection::Properties).await;
        let dashboard = OwnerDashboard::open(Repository::new(Arc::new(store)), &owner_state())
            .await
            .unwrap();
        assert_eq!(dashboard.view().state, ViewState::ReadyEmpty);
        assert_eq!(dashboard.view().notice.as_deref(), Some(LOAD_FAILED));
    }
}
