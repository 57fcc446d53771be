//! # Goal Creation Wizard
//!
//! A three-step, forward/backward sequencer that accumulates a goal creation
//! request: choose the executor, choose the goal type, then configure the
//! type-specific parameters and submit.
//!
//! ## Responsibilities:
//! - Guarded step transitions (step 1 needs an executor, step 2 a goal type)
//! - Data accumulation that survives moving back and forth between steps
//! - Per-type validation of the configuration step, committed all-or-nothing
//! - Tagging catalog fetches and submissions with a generation so late responses are dropped
//! - Refusing a second submission while one is in flight
//!
//! ## I/O:
//! The wizard itself never awaits anything. Operations that need reference
//! data return a [`CatalogTicket`]; the host fetches it (see
//! [`fetch_catalog`]) and hands the response back through
//! [`GoalWizard::apply_catalog`]. Submission is split the same way into
//! [`GoalWizard::begin_submission`] and [`GoalWizard::finish_submission`].
//! [`GoalWizard::load`] and [`GoalWizard::submit`] chain both halves for
//! hosts that can hold the wizard across an await.

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use shared::{
    ExecutorKind, ExecutorOption, GoalCreationRequest, GoalCreationResponse, GoalType,
    GoalTypeOption, PeriodType, RewardType, StoreItem,
};

use crate::backend::GoalsBackend;
use crate::catalog::{fetch_catalog, CatalogData, CatalogKind, CatalogResponse, CatalogTicket};
use crate::config::WizardConfig;
use crate::error::{BackendError, WizardError};
use crate::input::{
    self, non_blank, positive, HabitConfiguration, HabitReward, StepThreeInput, StoreItemSelection,
    TypeConfig,
};
use crate::request::{build_request, mixed_not_supported};
use crate::session::Session;
use crate::step::WizardStep;

/// Lifecycle of a wizard instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStatus {
    /// Not opened yet, or cancelled
    Closed,
    Open,
    /// The session is missing or expired; only `initialize` can recover
    Unauthenticated,
    /// The goal was created
    Completed,
}

/// The user or group the goal is created for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSelection {
    pub kind: ExecutorKind,
    pub id: String,
    /// Catalog entry as it was when selected
    pub snapshot: ExecutorOption,
}

impl From<&ExecutorOption> for ExecutorSelection {
    fn from(option: &ExecutorOption) -> Self {
        Self {
            kind: option.executor_type.into(),
            id: option.id.clone(),
            snapshot: option.clone(),
        }
    }
}

/// Everything collected so far. Recreated on every `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub executor: Option<ExecutorSelection>,
    pub goal_type: Option<GoalType>,
    pub title: String,
    pub description: String,
    pub deadline: Option<NaiveDate>,
    pub reward_coins: u32,
    pub type_config: Option<TypeConfig>,
    /// Reward kind last picked for a habit goal, before the rest of the form is valid
    pub habit_reward_type: Option<RewardType>,
}

impl WizardState {
    pub fn new(default_reward_coins: u32) -> Self {
        Self {
            step: WizardStep::SelectExecutor,
            executor: None,
            goal_type: None,
            title: String::new(),
            description: String::new(),
            deadline: None,
            reward_coins: default_reward_coins,
            type_config: None,
            habit_reward_type: None,
        }
    }
}

/// A submission that has been built and handed to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub generation: u64,
    pub request: GoalCreationRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Created(GoalCreationResponse),
    /// The wizard was closed or restarted while the request was in flight
    Discarded,
}

/// Snapshot of what the presentation layer needs to render the wizard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub status: WizardStatus,
    pub step: u8,
    pub step_title: &'static str,
    pub progress_percent: u8,
    pub executors: Vec<ExecutorOption>,
    pub goal_types: Vec<GoalTypeOption>,
    pub store_items: Vec<StoreItem>,
    /// False until the store item catalog has arrived, including after a failed fetch
    pub store_items_loaded: bool,
    /// A fetch for the options of the current step is in flight
    pub loading: bool,
    pub selected_executor_id: Option<String>,
    pub selected_goal_type: Option<GoalType>,
    pub selected_store_item_id: Option<String>,
    pub title: String,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub show_submit: bool,
    pub submitting: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoalWizard {
    config: WizardConfig,
    status: WizardStatus,
    state: WizardState,
    generation: u64,
    executors: Option<Vec<ExecutorOption>>,
    goal_types: Option<Vec<GoalTypeOption>>,
    store_items: Option<Vec<StoreItem>>,
    /// Catalogs requested for the current generation and not answered yet
    in_flight: Vec<CatalogKind>,
    submitting: bool,
    last_error: Option<String>,
}

impl Default for GoalWizard {
    fn default() -> Self {
        Self::new(WizardConfig::default())
    }
}

impl GoalWizard {
    pub fn new(config: WizardConfig) -> Self {
        let state = WizardState::new(config.default_reward_coins);
        Self {
            config,
            status: WizardStatus::Closed,
            state,
            generation: 0,
            executors: None,
            goal_types: None,
            store_items: None,
            in_flight: Vec::new(),
            submitting: false,
            last_error: None,
        }
    }

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn executors(&self) -> Option<&[ExecutorOption]> {
        self.executors.as_deref()
    }

    pub fn goal_types(&self) -> Option<&[GoalTypeOption]> {
        self.goal_types.as_deref()
    }

    pub fn store_items(&self) -> Option<&[StoreItem]> {
        self.store_items.as_deref()
    }

    pub fn is_loading(&self, kind: CatalogKind) -> bool {
        self.in_flight.contains(&kind)
    }

    /// Open the wizard with fresh state and request the executor catalog
    pub fn initialize(&mut self, session: &Session) -> Result<CatalogTicket, WizardError> {
        self.reset();

        if !session.is_authenticated() {
            warn!("Goal wizard opened without a valid session");
            self.status = WizardStatus::Unauthenticated;
            return self.record(Err(WizardError::Unauthenticated));
        }

        self.status = WizardStatus::Open;
        info!("Goal wizard opened (generation {})", self.generation);
        Ok(self.issue(CatalogKind::Executors))
    }

    /// Abandon the wizard. Nothing is sent; in-flight responses will be discarded.
    pub fn cancel(&mut self) {
        info!("Goal wizard cancelled at step {}", self.state.step);
        self.reset();
        self.status = WizardStatus::Closed;
    }

    pub fn select_executor(&mut self, choice: &ExecutorOption) -> Result<(), WizardError> {
        let result = self
            .ensure_editable("select executor", WizardStep::SelectExecutor)
            .map(|_| {
                debug!("Executor selected: {} ({:?})", choice.id, choice.executor_type);
                self.state.executor = Some(ExecutorSelection::from(choice));
            });
        self.record(result)
    }

    /// Select an executor from the loaded catalog by id
    pub fn select_executor_by_id(&mut self, id: &str) -> Result<(), WizardError> {
        let found = self
            .executors
            .as_ref()
            .and_then(|list| list.iter().find(|e| e.id == id))
            .cloned();
        match found {
            Some(choice) => self.select_executor(&choice),
            None => self.record(Err(WizardError::validation("executor", "executor not found"))),
        }
    }

    pub fn select_goal_type(&mut self, goal_type: GoalType) -> Result<(), WizardError> {
        let result = self
            .ensure_editable("select goal type", WizardStep::SelectGoalType)
            .map(|_| {
                if self.state.goal_type != Some(goal_type) && self.state.type_config.is_some() {
                    debug!("Goal type changed to {}, dropping previous configuration", goal_type);
                    self.state.type_config = None;
                }
                if self.state.goal_type != Some(goal_type) {
                    self.state.habit_reward_type = None;
                }
                self.state.goal_type = Some(goal_type);
            });
        self.record(result)
    }

    pub fn select_goal_type_option(&mut self, option: &GoalTypeOption) -> Result<(), WizardError> {
        self.select_goal_type(option.goal_type)
    }

    /// Move one step forward if the current step is complete
    pub fn advance(&mut self) -> Result<Option<CatalogTicket>, WizardError> {
        let result = self.try_advance();
        self.record(result)
    }

    fn try_advance(&mut self) -> Result<Option<CatalogTicket>, WizardError> {
        self.ensure_idle()?;

        match self.state.step {
            WizardStep::SelectExecutor => {
                if self.state.executor.is_none() {
                    return Err(WizardError::validation("executor", "executor required"));
                }
                self.move_to(WizardStep::SelectGoalType);
                Ok(Some(self.issue(CatalogKind::GoalTypes)))
            }
            WizardStep::SelectGoalType => {
                let goal_type = self
                    .state
                    .goal_type
                    .ok_or_else(|| WizardError::validation("goal_type", "goal type required"))?;
                self.move_to(WizardStep::ConfigureAndSubmit);
                Ok(self.step_three_ticket(goal_type))
            }
            WizardStep::ConfigureAndSubmit => Ok(None),
        }
    }

    fn step_three_ticket(&mut self, goal_type: GoalType) -> Option<CatalogTicket> {
        let habit_store_reward = self.state.habit_reward_type == Some(RewardType::StoreItem);

        match goal_type {
            GoalType::StoreItem => Some(self.issue(CatalogKind::StoreItems)),
            GoalType::HabitBuilding if habit_store_reward && self.store_items.is_none() => {
                Some(self.issue(CatalogKind::StoreItems))
            }
            _ => None,
        }
    }

    /// Move one step back. Collected data is kept.
    ///
    /// Returns a ticket when the options of the destination step are missing,
    /// which is how a failed catalog fetch gets retried.
    pub fn retreat(&mut self) -> Result<Option<CatalogTicket>, WizardError> {
        let result = self.try_retreat();
        self.record(result)
    }

    fn try_retreat(&mut self) -> Result<Option<CatalogTicket>, WizardError> {
        self.ensure_idle()?;

        let previous = self.state.step.prev().ok_or(WizardError::InvalidStep {
            operation: "go back",
            step: self.state.step,
        })?;
        self.move_to(previous);

        let missing = match previous {
            WizardStep::SelectExecutor if self.executors.is_none() => Some(CatalogKind::Executors),
            WizardStep::SelectGoalType if self.goal_types.is_none() => Some(CatalogKind::GoalTypes),
            _ => None,
        };
        Ok(missing.map(|kind| self.issue(kind)))
    }

    /// The user switched the reward of a habit goal; store items may need to be loaded
    pub fn habit_reward_type_changed(
        &mut self,
        reward_type: RewardType,
    ) -> Result<Option<CatalogTicket>, WizardError> {
        let result = self.try_change_reward_type(reward_type);
        self.record(result)
    }

    fn try_change_reward_type(
        &mut self,
        reward_type: RewardType,
    ) -> Result<Option<CatalogTicket>, WizardError> {
        self.ensure_editable("choose a reward", WizardStep::ConfigureAndSubmit)?;
        if self.state.goal_type != Some(GoalType::HabitBuilding) {
            return Err(WizardError::validation(
                "reward_type",
                "Rewards can only be chosen for habit goals",
            ));
        }

        self.state.habit_reward_type = Some(reward_type);
        let needs_items = reward_type == RewardType::StoreItem
            && self.store_items.is_none()
            && !self.is_loading(CatalogKind::StoreItems);
        Ok(needs_items.then(|| self.issue(CatalogKind::StoreItems)))
    }

    /// Pick the target of a store item goal from the loaded catalog
    pub fn select_store_item(&mut self, item_id: &str) -> Result<(), WizardError> {
        let result = self.try_select_store_item(item_id);
        self.record(result)
    }

    fn try_select_store_item(&mut self, item_id: &str) -> Result<(), WizardError> {
        self.ensure_editable("select a store item", WizardStep::ConfigureAndSubmit)?;
        if self.state.goal_type != Some(GoalType::StoreItem) {
            return Err(WizardError::validation(
                "store_item_id",
                "Store items can only be picked for store item goals",
            ));
        }

        let items = self.loaded_store_items("store_item_id")?;
        let item = items
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| WizardError::validation("store_item_id", "item not found"))?;

        let selection = StoreItemSelection::from(item);
        if self.state.title.trim().is_empty() {
            self.state.title = format!("Save up for {}", selection.title);
        }
        debug!("Store item selected: {} ({} coins)", selection.item_id, selection.cost);
        self.state.type_config = Some(TypeConfig::StoreItem(selection));
        Ok(())
    }

    /// Validate and store the configuration step. Nothing is committed if any field is invalid.
    pub fn collect_step_three_fields(&mut self, input: &StepThreeInput) -> Result<(), WizardError> {
        let result = self.try_collect(input);
        self.record(result)
    }

    fn try_collect(&mut self, input: &StepThreeInput) -> Result<(), WizardError> {
        self.ensure_editable("configure the goal", WizardStep::ConfigureAndSubmit)?;
        let goal_type = self
            .state
            .goal_type
            .ok_or_else(|| WizardError::validation("goal_type", "goal type required"))?;

        let deadline = input::deadline(&input.deadline)?;
        let reward_coins = input::non_negative("reward_coins", &input.reward_coins)?
            .unwrap_or(self.config.default_reward_coins);

        let type_config = match goal_type {
            GoalType::CoinSaving => TypeConfig::CoinSaving {
                target: positive("coin_target", &input.coin_target)?,
            },
            GoalType::StoreItem => match &self.state.type_config {
                Some(config @ TypeConfig::StoreItem(_)) => config.clone(),
                _ => return Err(WizardError::validation("store_item_id", "item required")),
            },
            GoalType::HabitBuilding => TypeConfig::HabitBuilding(self.parse_habit(input)?),
            GoalType::Mixed => return Err(mixed_not_supported()),
        };

        if let Some(title) = &input.title {
            self.state.title = title.trim().to_string();
        }
        if let Some(description) = &input.description {
            self.state.description = description.trim().to_string();
        }
        self.state.deadline = deadline;
        self.state.reward_coins = reward_coins;
        if let TypeConfig::HabitBuilding(habit) = &type_config {
            self.state.habit_reward_type = Some(habit.reward.reward_type());
        }
        self.state.type_config = Some(type_config);

        debug!("Step three collected for {} goal", goal_type);
        Ok(())
    }

    fn parse_habit(&self, input: &StepThreeInput) -> Result<HabitConfiguration, WizardError> {
        let actions_count = positive("actions", &input.actions)?;
        let period_value = positive("period_value", &input.period_value)?;

        let period_type = non_blank(&input.period_type)
            .ok_or_else(|| {
                WizardError::validation("period_type", "Choose a period: day, week or month")
            })?
            .parse::<PeriodType>()
            .map_err(|e| WizardError::validation("period_type", e.to_string()))?;

        let reward_type = non_blank(&input.reward_type)
            .ok_or_else(|| {
                WizardError::validation("reward_type", "Choose how the habit is rewarded")
            })?
            .parse::<RewardType>()
            .map_err(|e| WizardError::validation("reward_type", e.to_string()))?;

        let reward = match reward_type {
            RewardType::Coins => HabitReward::Coins(positive("reward_value", &input.reward_value)?),
            RewardType::StoreItem => {
                let item_id = non_blank(&input.reward_item_id).ok_or_else(|| {
                    WizardError::validation("reward_item_id", "Choose a store item as the reward")
                })?;
                let item = self
                    .loaded_store_items("reward_item_id")?
                    .iter()
                    .find(|item| item.id == item_id)
                    .ok_or_else(|| {
                        WizardError::validation("reward_item_id", "Reward item not found")
                    })?;
                HabitReward::StoreItem {
                    item_id: item.id.clone(),
                    item_title: item.title.clone(),
                }
            }
        };

        Ok(HabitConfiguration {
            actions_count,
            period_value,
            period_type,
            reward,
            is_streak_required: input.streak_required,
        })
    }

    fn loaded_store_items(&self, field: &str) -> Result<&[StoreItem], WizardError> {
        match &self.store_items {
            Some(items) => Ok(items.as_slice()),
            None if self.is_loading(CatalogKind::StoreItems) => {
                Err(WizardError::validation(field, "Store items are still loading"))
            }
            None => Err(WizardError::validation(
                field,
                "Store items could not be loaded; go back and open this step again to retry",
            )),
        }
    }

    /// Build the request and mark the wizard as submitting
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, WizardError> {
        let result = self
            .ensure_editable("submit", WizardStep::ConfigureAndSubmit)
            .and_then(|_| build_request(&self.state))
            .map(|request| {
                info!("Submitting {} goal '{}'", request.goal_type, request.title);
                self.submitting = true;
                PendingSubmission {
                    generation: self.generation,
                    request,
                }
            });
        self.record(result)
    }

    /// Apply the backend's answer to a submission
    pub fn finish_submission(
        &mut self,
        pending: PendingSubmission,
        result: Result<GoalCreationResponse, BackendError>,
    ) -> Result<SubmissionOutcome, WizardError> {
        if self.status != WizardStatus::Open || pending.generation != self.generation {
            info!(
                "Discarding submission result for generation {} (current {})",
                pending.generation, self.generation
            );
            return Ok(SubmissionOutcome::Discarded);
        }

        self.submitting = false;
        match result {
            Ok(response) => {
                info!("Goal created: {:?}", response.id);
                self.reset();
                self.status = WizardStatus::Completed;
                Ok(SubmissionOutcome::Created(response))
            }
            Err(BackendError::Unauthenticated) => {
                self.halt();
                self.record(Err(WizardError::Unauthenticated))
            }
            Err(e) => {
                warn!("Goal creation rejected: {}", e);
                self.record(Err(WizardError::BackendRejection(e.to_string())))
            }
        }
    }

    /// Build, send and settle a submission in one go
    pub async fn submit<B>(&mut self, backend: &B) -> Result<GoalCreationResponse, WizardError>
    where
        B: GoalsBackend + ?Sized,
    {
        let pending = self.begin_submission()?;
        let result = backend.create_goal(&pending.request).await;
        match self.finish_submission(pending, result)? {
            SubmissionOutcome::Created(response) => Ok(response),
            SubmissionOutcome::Discarded => Err(WizardError::NotOpen),
        }
    }

    /// Store fetched reference data if it still belongs to the current generation.
    ///
    /// Returns `Ok(false)` when the response was stale and ignored.
    pub fn apply_catalog(&mut self, response: CatalogResponse) -> Result<bool, WizardError> {
        let CatalogResponse { ticket, result } = response;

        if self.status != WizardStatus::Open || ticket.generation != self.generation {
            debug!(
                "Discarding stale {} response (generation {}, current {})",
                ticket.kind, ticket.generation, self.generation
            );
            return Ok(false);
        }

        self.in_flight.retain(|kind| *kind != ticket.kind);
        match result {
            Ok(CatalogData::Executors(list)) => self.executors = Some(list),
            Ok(CatalogData::GoalTypes(list)) => self.goal_types = Some(list),
            Ok(CatalogData::StoreItems(list)) => self.store_items = Some(list),
            Err(BackendError::Unauthenticated) => {
                self.halt();
                return self.record(Err(WizardError::Unauthenticated));
            }
            Err(e) => {
                warn!("Failed to load {}: {}", ticket.kind, e);
                self.clear_catalog(ticket.kind);
                return self.record(Err(WizardError::TransientFetchFailure {
                    catalog: ticket.kind,
                    message: e.to_string(),
                }));
            }
        }

        debug!("Loaded {} (generation {})", ticket.kind, ticket.generation);
        Ok(true)
    }

    /// Fetch and apply a catalog in one go
    pub async fn load<B>(&mut self, backend: &B, ticket: CatalogTicket) -> Result<bool, WizardError>
    where
        B: GoalsBackend + ?Sized,
    {
        let response = fetch_catalog(backend, ticket).await;
        self.apply_catalog(response)
    }

    pub fn view(&self) -> WizardView {
        let step = self.state.step;
        let loading = self.status == WizardStatus::Open
            && self.is_loading(match step {
                WizardStep::SelectExecutor => CatalogKind::Executors,
                WizardStep::SelectGoalType => CatalogKind::GoalTypes,
                WizardStep::ConfigureAndSubmit => CatalogKind::StoreItems,
            });
        let editable = self.status == WizardStatus::Open && !self.submitting;

        WizardView {
            status: self.status,
            step: step.number(),
            step_title: step.title(),
            progress_percent: step.progress_percent(),
            executors: self.executors.clone().unwrap_or_default(),
            goal_types: self.goal_types.clone().unwrap_or_default(),
            store_items: self.store_items.clone().unwrap_or_default(),
            store_items_loaded: self.store_items.is_some(),
            loading,
            selected_executor_id: self.state.executor.as_ref().map(|e| e.id.clone()),
            selected_goal_type: self.state.goal_type,
            selected_store_item_id: match &self.state.type_config {
                Some(TypeConfig::StoreItem(item)) => Some(item.item_id.clone()),
                _ => None,
            },
            title: self.state.title.clone(),
            can_advance: editable
                && match step {
                    WizardStep::SelectExecutor => self.state.executor.is_some(),
                    WizardStep::SelectGoalType => self.state.goal_type.is_some(),
                    WizardStep::ConfigureAndSubmit => false,
                },
            can_retreat: editable && step.prev().is_some(),
            show_submit: step == WizardStep::ConfigureAndSubmit,
            submitting: self.submitting,
            last_error: self.last_error.clone(),
        }
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        match self.status {
            WizardStatus::Open => Ok(()),
            WizardStatus::Unauthenticated => Err(WizardError::Unauthenticated),
            WizardStatus::Closed | WizardStatus::Completed => Err(WizardError::NotOpen),
        }
    }

    fn ensure_idle(&self) -> Result<(), WizardError> {
        self.ensure_open()?;
        if self.submitting {
            return Err(WizardError::SubmissionInProgress);
        }
        Ok(())
    }

    fn ensure_editable(
        &self,
        operation: &'static str,
        step: WizardStep,
    ) -> Result<(), WizardError> {
        self.ensure_idle()?;
        if self.state.step != step {
            return Err(WizardError::InvalidStep {
                operation,
                step: self.state.step,
            });
        }
        Ok(())
    }

    fn move_to(&mut self, step: WizardStep) {
        debug!("Goal wizard step {} -> {}", self.state.step, step);
        self.state.step = step;
        self.generation += 1;
        self.in_flight.clear();
    }

    /// Hand out a ticket for the current generation; the old options are hidden until it resolves
    fn issue(&mut self, kind: CatalogKind) -> CatalogTicket {
        self.clear_catalog(kind);
        if !self.in_flight.contains(&kind) {
            self.in_flight.push(kind);
        }
        CatalogTicket {
            kind,
            generation: self.generation,
        }
    }

    fn clear_catalog(&mut self, kind: CatalogKind) {
        match kind {
            CatalogKind::Executors => self.executors = None,
            CatalogKind::GoalTypes => self.goal_types = None,
            CatalogKind::StoreItems => self.store_items = None,
        }
    }

    fn halt(&mut self) {
        warn!("Session expired, goal wizard halted");
        self.status = WizardStatus::Unauthenticated;
        self.submitting = false;
        self.generation += 1;
        self.in_flight.clear();
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.state = WizardState::new(self.config.default_reward_coins);
        self.executors = None;
        self.goal_types = None;
        self.store_items = None;
        self.in_flight.clear();
        self.submitting = false;
        self.last_error = None;
    }

    fn record<T>(&mut self, result: Result<T, WizardError>) -> Result<T, WizardError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                debug!("Goal wizard error: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        result
    }
}
