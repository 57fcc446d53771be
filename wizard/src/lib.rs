//! Goal creation wizard for FamilyCoins.
//!
//! A UI-independent state machine that walks a parent through choosing who a
//! goal is for, what kind of goal it is and how it is measured, and then
//! turns the collected answers into a [`shared::GoalCreationRequest`].
//! Network access goes through the [`GoalsBackend`] trait.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod input;
pub mod request;
pub mod session;
pub mod step;
pub mod wizard;

#[cfg(test)]
pub(crate) mod test_utils;

pub use backend::GoalsBackend;
pub use catalog::{fetch_catalog, CatalogData, CatalogKind, CatalogResponse, CatalogTicket};
pub use config::WizardConfig;
pub use error::{BackendError, WizardError};
pub use input::{HabitConfiguration, HabitReward, StepThreeInput, StoreItemSelection, TypeConfig};
pub use request::build_request;
pub use session::Session;
pub use step::WizardStep;
pub use wizard::{
    ExecutorSelection, GoalWizard, PendingSubmission, SubmissionOutcome, WizardState, WizardStatus,
    WizardView,
};
