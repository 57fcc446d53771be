//! Catalog retrieval tickets.
//!
//! Operations that need reference data hand out a [`CatalogTicket`] instead of
//! fetching it themselves. The ticket remembers the wizard generation it was
//! issued at, so a response that arrives after the user moved on (or closed
//! the wizard) can be recognised and dropped in
//! [`GoalWizard::apply_catalog`](crate::wizard::GoalWizard::apply_catalog).

use log::debug;
use serde::{Deserialize, Serialize};
use shared::{ExecutorOption, GoalTypeOption, StoreItem};
use std::fmt;

use crate::backend::GoalsBackend;
use crate::error::BackendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    Executors,
    GoalTypes,
    StoreItems,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogKind::Executors => "executors",
            CatalogKind::GoalTypes => "goal types",
            CatalogKind::StoreItems => "store items",
        };
        write!(f, "{}", name)
    }
}

/// Request for reference data, tagged with the generation it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogTicket {
    pub kind: CatalogKind,
    pub generation: u64,
}

/// Loaded reference data
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogData {
    Executors(Vec<ExecutorOption>),
    GoalTypes(Vec<GoalTypeOption>),
    StoreItems(Vec<StoreItem>),
}

/// Outcome of a catalog fetch, ready to be applied to the wizard that issued the ticket
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogResponse {
    pub ticket: CatalogTicket,
    pub result: Result<CatalogData, BackendError>,
}

/// Perform the fetch a ticket asks for
pub async fn fetch_catalog<B>(backend: &B, ticket: CatalogTicket) -> CatalogResponse
where
    B: GoalsBackend + ?Sized,
{
    debug!("Fetching {} (generation {})", ticket.kind, ticket.generation);

    let result = match ticket.kind {
        CatalogKind::Executors => backend.fetch_executors().await.map(CatalogData::Executors),
        CatalogKind::GoalTypes => backend.fetch_goal_types().await.map(CatalogData::GoalTypes),
        CatalogKind::StoreItems => backend.fetch_store_items().await.map(CatalogData::StoreItems),
    };

    CatalogResponse { ticket, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_store_items, MockBackend};

    #[tokio::test]
    async fn test_fetch_dispatches_on_kind() {
        let backend = MockBackend::new();
        let ticket = CatalogTicket { kind: CatalogKind::StoreItems, generation: 7 };

        let response = fetch_catalog(&backend, ticket).await;

        assert_eq!(response.ticket, ticket);
        assert_eq!(response.result, Ok(CatalogData::StoreItems(sample_store_items())));
        assert_eq!(backend.fetch_count(CatalogKind::StoreItems), 1);
        assert_eq!(backend.fetch_count(CatalogKind::Executors), 0);
    }

    #[tokio::test]
    async fn test_fetch_keeps_backend_error() {
        let backend = MockBackend::new();
        backend.fail_catalog(CatalogKind::GoalTypes, BackendError::Transport("offline".into()));

        let ticket = CatalogTicket { kind: CatalogKind::GoalTypes, generation: 1 };
        let response = fetch_catalog(&backend, ticket).await;

        assert_eq!(response.result, Err(BackendError::Transport("offline".into())));
    }
}
