//! Owner and admin dashboards.
//!
//! Both are opened through a role gate that runs before anything is
//! fetched, then load into a [`DashboardView`]. Load failures never escape:
//! the view settles as ready-empty with a notice.

pub mod admin;
pub mod owner;

use serde::Serialize;
use tracing::warn;

use crate::store::StoreError;

pub use admin::{AdminCounts, AdminDashboard, AdminData};
pub use owner::OwnerDashboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewState {
    Loading,
    Ready,
    ReadyEmpty,
}

/// Anything a dashboard can show; decides ready versus ready-empty.
pub trait ViewData: Default {
    fn is_empty(&self) -> bool;
}

impl<T> ViewData for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<T> {
    pub state: ViewState,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl<T: ViewData> DashboardView<T> {
    pub fn loading() -> Self {
        Self {
            state: ViewState::Loading,
            data: T::default(),
            notice: None,
        }
    }

    /// Settles the view from a fetch result. An error keeps nothing and
    /// shows `failure_notice`.
    pub fn settle(&mut self, result: Result<T, StoreError>, failure_notice: &str) {
        match result {
            Ok(data) => {
                self.state = if data.is_empty() {
                    ViewState::ReadyEmpty
                } else {
                    ViewState::Ready
                };
                self.data = data;
                self.notice = None;
            }
            Err(e) => {
                warn!("Dashboard load failed: {}", e);
                self.state = ViewState::ReadyEmpty;
                self.data = T::default();
                self.notice = Some(failure_notice.to_string());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == ViewState::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_to_ready_or_ready_empty() {
        let mut view: DashboardView<Vec<u8>> = DashboardView::loading();
        assert!(view.is_loading());

        view.settle(Ok(vec![1]), "failed");
        assert_eq!(view.state, ViewState::Ready);

        view.settle(Ok(vec![]), "failed");
        assert_eq!(view.state, ViewState::ReadyEmpty);
        assert_eq!(view.notice, None);
    }

    #[test]
    fn failure_lands_in_ready_empty_with_notice() {
        let mut view: DashboardView<Vec<u8>> = DashboardView::loading();
        view.settle(Ok(vec![1, 2]), "failed");
        view.settle(Err(StoreError::Transport("down".to_string())), "failed");
        assert_eq!(view.state, ViewState::ReadyEmpty);
        assert!(view.data.is_empty());
        assert_eq!(view.notice.as_deref(), Some("failed"));
    }
}
