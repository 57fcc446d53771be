//! # Backend Collaborator
//!
//! The wizard never talks HTTP itself. Whatever hosts it (the yew frontend, a
//! test) supplies an implementation of [`GoalsBackend`].
//!
//! The trait is `?Send` because browser fetch futures are not `Send`.

use async_trait::async_trait;
use shared::{ExecutorOption, GoalCreationRequest, GoalCreationResponse, GoalTypeOption, StoreItem};

use crate::error::BackendError;

#[async_trait(?Send)]
pub trait GoalsBackend {
    /// `GET /goals/form-data/executors`
    async fn fetch_executors(&self) -> Result<Vec<ExecutorOption>, BackendError>;

    /// `GET /goals/form-data/goal-types`
    async fn fetch_goal_types(&self) -> Result<Vec<GoalTypeOption>, BackendError>;

    /// `GET /store`
    async fn fetch_store_items(&self) -> Result<Vec<StoreItem>, BackendError>;

    /// `POST /goals/enhanced`
    async fn create_goal(
        &self,
        request: &GoalCreationRequest,
    ) -> Result<GoalCreationResponse, BackendError>;
}
