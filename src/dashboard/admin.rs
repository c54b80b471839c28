use serde::Serialize;

use super::{DashboardView, ViewData};
use crate::listing::{ConfirmedDelete, FormError};
use crate::models::{ContactMessage, Listing, Profile, Role};
use crate::session::{AccessError, SessionState};
use crate::store::{Repository, StoreError};

pub const LOAD_FAILED: &str = "Failed to load dashboard data";

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminData {
    pub profiles: Vec<Profile>,
    pub listings: Vec<Listing>,
    pub contacts: Vec<ContactMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminCounts {
    pub users: usize,
    pub properties: usize,
    pub messages: usize,
}

impl AdminData {
    pub fn counts(&self) -> AdminCounts {
        AdminCounts {
            users: self.profiles.len(),
            properties: self.listings.len(),
            messages: self.contacts.len(),
        }
    }
}

impl ViewData for AdminData {
    fn is_empty(&self) -> bool {
        self.profiles.is_empty() && self.listings.is_empty() && self.contacts.is_empty()
    }
}

/// Users, listings and contact messages with moderation.
pub struct AdminDashboard {
    repo: Repository,
    view: DashboardView<AdminData>,
}

impl AdminDashboard {
    pub fn new(repo: Repository, state: &SessionState) -> Result<Self, AccessError> {
        state.require(Role::Admin)?;
        Ok(Self {
            repo,
            view: DashboardView::loading(),
        })
    }

    pub async fn open(repo: Repository, state: &SessionState) -> Result<Self, AccessError> {
        let mut dashboard = Self::new(repo, state)?;
        dashboard.refresh().await;
        Ok(dashboard)
    }

    /// Fetches all three collections at once. One failure fails the whole
    /// load.
    pub async fn refresh(&mut self) {
        let result = Self::fetch(&self.repo).await;
        self.view.settle(result, LOAD_FAILED);
    }

    async fn fetch(repo: &Repository) -> Result<AdminData, StoreError> {
        let (profiles, listings, contacts) = futures::try_join!(
            repo.profiles(),
            repo.all_listings_with_owner(),
            repo.contacts()
        )?;
        Ok(AdminData {
            profiles,
            listings,
            contacts,
        })
    }

    pub fn view(&self) -> &DashboardView<AdminData> {
        &self.view
    }

    pub fn into_view(self) -> DashboardView<AdminData> {
        self.view
    }

    pub fn counts(&self) -> AdminCounts {
        self.view.data.counts()
    }

    pub async fn delete_listing(&mut self, request: ConfirmedDelete) -> Result<(), FormError> {
        request.execute(&self.repo).await?;
        self.refresh().await;
        Ok(())
    }
}
