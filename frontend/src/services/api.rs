use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder, Response};
use goal_wizard::{BackendError, GoalsBackend, Session};
use serde::de::DeserializeOwned;
use shared::{
    ApiErrorBody, AppConfig, ExecutorOption, ExecutorsResponse, GoalCreationRequest,
    GoalCreationResponse, GoalTypeOption, GoalTypesResponse, StoreItem, StoreItemsResponse,
};

use crate::services::session_store;

/// API client for communicating with the FamilyCoins backend.
///
/// Clones share one session, so a 401 seen by any of them signs all of them out.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    config: AppConfig,
    session: Rc<RefCell<Session>>,
}

impl ApiClient {
    pub fn new(config: AppConfig, session: Session) -> Self {
        Self {
            config,
            session: Rc::new(RefCell::new(session)),
        }
    }

    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Content-Type", "application/json");
        let authorization = self.session.borrow().authorization_header();
        match authorization {
            Some(value) => builder.header("Authorization", &value),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.config.endpoint(path);

        let response = self
            .authorized(Request::get(&url))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        self.read_response(response).await
    }

    /// Map the HTTP status to a backend error, or parse the body
    async fn read_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, BackendError> {
        let status = response.status();

        if status == 401 {
            log::warn!("Session expired, clearing cached credentials");
            self.session.borrow_mut().invalidate();
            session_store::clear();
            return Err(BackendError::Unauthenticated);
        }

        if !response.ok() {
            let detail = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message());
            return Err(BackendError::Rejected(
                detail.unwrap_or_else(|| format!("HTTP error! status: {}", status)),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Transport(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait(?Send)]
impl GoalsBackend for ApiClient {
    async fn fetch_executors(&self) -> Result<Vec<ExecutorOption>, BackendError> {
        let data: ExecutorsResponse = self.get_json("/goals/form-data/executors").await?;
        Ok(data.executors)
    }

    async fn fetch_goal_types(&self) -> Result<Vec<GoalTypeOption>, BackendError> {
        let data: GoalTypesResponse = self.get_json("/goals/form-data/goal-types").await?;
        Ok(data.goal_types)
    }

    async fn fetch_store_items(&self) -> Result<Vec<StoreItem>, BackendError> {
        let data: StoreItemsResponse = self.get_json("/store").await?;
        Ok(data.items)
    }

    async fn create_goal(
        &self,
        request: &GoalCreationRequest,
    ) -> Result<GoalCreationResponse, BackendError> {
        let url = self.config.endpoint("/goals/enhanced");

        let response = self
            .authorized(Request::post(&url))
            .json(request)
            .map_err(|e| BackendError::Transport(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        self.read_response(response).await
    }
}
