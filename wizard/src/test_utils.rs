//! Fixtures and an in-memory backend shared by the unit tests.

use async_trait::async_trait;
use shared::{
    ExecutorMember, ExecutorOption, ExecutorType, GoalCreationRequest, GoalCreationResponse,
    GoalType, GoalTypeOption, StoreItem, User, UserRole,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::backend::GoalsBackend;
use crate::catalog::CatalogKind;
use crate::error::BackendError;
use crate::session::Session;

pub(crate) fn sample_parent() -> User {
    User {
        id: "p1".to_string(),
        name: "Anna".to_string(),
        role: UserRole::Parent,
        family_id: Some("f1".to_string()),
    }
}

pub(crate) fn sample_session() -> Session {
    Session::new("token-123", sample_parent())
}

pub(crate) fn sample_individual() -> ExecutorOption {
    child("u1", "Masha")
}

fn child(id: &str, name: &str) -> ExecutorOption {
    ExecutorOption {
        executor_type: ExecutorType::Individual,
        id: id.to_string(),
        name: name.to_string(),
        description: "Child".to_string(),
        role: Some(UserRole::Child),
        avatar: name.chars().next().map(|c| c.to_string()),
        icon: None,
        members: Vec::new(),
    }
}

pub(crate) fn sample_group() -> ExecutorOption {
    ExecutorOption {
        executor_type: ExecutorType::Group,
        id: "all_children".to_string(),
        name: "All children".to_string(),
        description: "2 children".to_string(),
        role: None,
        avatar: None,
        icon: Some("fas fa-users".to_string()),
        members: vec![
            ExecutorMember {
                id: Some("u1".to_string()),
                name: "Masha".to_string(),
                role: Some(UserRole::Child),
            },
            ExecutorMember {
                id: Some("u2".to_string()),
                name: "Petya".to_string(),
                role: Some(UserRole::Child),
            },
        ],
    }
}

pub(crate) fn sample_executors() -> Vec<ExecutorOption> {
    vec![sample_individual(), child("u2", "Petya"), sample_group()]
}

pub(crate) fn sample_goal_types() -> Vec<GoalTypeOption> {
    GoalType::ALL
        .iter()
        .map(|goal_type| GoalTypeOption {
            goal_type: *goal_type,
            name: goal_type.display_name().to_string(),
            description: String::new(),
            icon: goal_type.icon().to_string(),
        })
        .collect()
}

pub(crate) fn sample_store_items() -> Vec<StoreItem> {
    vec![
        StoreItem {
            id: "item-1".to_string(),
            title: "Ice cream".to_string(),
            cost: 150,
            image_url: None,
            availability_end_date: None,
        },
        StoreItem {
            id: "item-7".to_string(),
            title: "Lego set".to_string(),
            cost: 1200,
            image_url: Some("/images/lego.png".to_string()),
            availability_end_date: Some("2026-12-31".to_string()),
        },
    ]
}

/// Backend serving the sample catalogs, with switchable failures
pub(crate) struct MockBackend {
    failures: RefCell<HashMap<CatalogKind, BackendError>>,
    fetches: RefCell<HashMap<CatalogKind, usize>>,
    create_results: RefCell<VecDeque<Result<GoalCreationResponse, BackendError>>>,
    submitted: RefCell<Vec<GoalCreationRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            failures: RefCell::new(HashMap::new()),
            fetches: RefCell::new(HashMap::new()),
            create_results: RefCell::new(VecDeque::new()),
            submitted: RefCell::new(Vec::new()),
        }
    }

    pub fn fail_catalog(&self, kind: CatalogKind, error: BackendError) {
        self.failures.borrow_mut().insert(kind, error);
    }

    pub fn restore_catalogs(&self) {
        self.failures.borrow_mut().clear();
    }

    /// Answer the next `create_goal` call with `result` instead of success
    pub fn queue_create_result(&self, result: Result<GoalCreationResponse, BackendError>) {
        self.create_results.borrow_mut().push_back(result);
    }

    pub fn fetch_count(&self, kind: CatalogKind) -> usize {
        self.fetches.borrow().get(&kind).copied().unwrap_or(0)
    }

    pub fn submitted(&self) -> Vec<GoalCreationRequest> {
        self.submitted.borrow().clone()
    }

    fn serve<T>(&self, kind: CatalogKind, data: impl FnOnce() -> T) -> Result<T, BackendError> {
        *self.fetches.borrow_mut().entry(kind).or_insert(0) += 1;
        match self.failures.borrow().get(&kind) {
            Some(error) => Err(error.clone()),
            None => Ok(data()),
        }
    }
}

#[async_trait(?Send)]
impl GoalsBackend for MockBackend {
    async fn fetch_executors(&self) -> Result<Vec<ExecutorOption>, BackendError> {
        self.serve(CatalogKind::Executors, sample_executors)
    }

    async fn fetch_goal_types(&self) -> Result<Vec<GoalTypeOption>, BackendError> {
        self.serve(CatalogKind::GoalTypes, sample_goal_types)
    }

    async fn fetch_store_items(&self) -> Result<Vec<StoreItem>, BackendError> {
        self.serve(CatalogKind::StoreItems, sample_store_items)
    }

    async fn create_goal(
        &self,
        request: &GoalCreationRequest,
    ) -> Result<GoalCreationResponse, BackendError> {
        self.submitted.borrow_mut().push(request.clone());
        self.create_results.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(GoalCreationResponse {
                id: Some("goal-1".to_string()),
                message: Some("Goal created".to_string()),
            })
        })
    }
}
