//! Projection of the accumulated wizard state into the backend request.

use shared::{
    ConditionType, ExecutorDescriptor, ExecutorKind, GoalConditionRequest, GoalCreationRequest,
    GoalType, HabitData, StoreItemData,
};

use crate::error::WizardError;
use crate::input::{HabitConfiguration, HabitReward, StoreItemSelection, TypeConfig};
use crate::wizard::{ExecutorSelection, WizardState};

/// Build the immutable creation request.
///
/// Fails with a validation error naming the first missing piece, in step order.
pub fn build_request(state: &WizardState) -> Result<GoalCreationRequest, WizardError> {
    let executor = state
        .executor
        .as_ref()
        .ok_or_else(|| WizardError::validation("executor", "executor required"))?;
    let goal_type = state
        .goal_type
        .ok_or_else(|| WizardError::validation("goal_type", "goal type required"))?;

    let config = match (goal_type, state.type_config.as_ref()) {
        (GoalType::CoinSaving, Some(config @ TypeConfig::CoinSaving { .. })) => config,
        (GoalType::StoreItem, Some(config @ TypeConfig::StoreItem(_))) => config,
        (GoalType::HabitBuilding, Some(config @ TypeConfig::HabitBuilding(_))) => config,
        (GoalType::CoinSaving, _) => {
            return Err(WizardError::validation("coin_target", "coin target required"))
        }
        (GoalType::StoreItem, _) => {
            return Err(WizardError::validation("store_item_id", "item required"))
        }
        (GoalType::HabitBuilding, _) => {
            return Err(WizardError::validation("actions", "habit settings required"))
        }
        (GoalType::Mixed, _) => return Err(mixed_not_supported()),
    };

    let title = match state.title.trim() {
        "" => return Err(WizardError::validation("title", "Enter the goal title")),
        title => title.to_string(),
    };
    let condition = condition_for(config);

    let mut request = GoalCreationRequest {
        title,
        description: state.description.trim().to_string(),
        goal_type,
        executor: executor_descriptor(executor),
        conditions: vec![condition],
        deadline: state.deadline,
        reward_coins: state.reward_coins,
        habit_data: None,
        store_item_data: None,
        target_store_item_id: None,
    };

    match config {
        TypeConfig::CoinSaving { .. } => {}
        TypeConfig::StoreItem(item) => {
            request.store_item_data = Some(store_item_data(item));
            request.target_store_item_id = Some(item.item_id.clone());
        }
        TypeConfig::HabitBuilding(habit) => {
            if matches!(habit.reward, HabitReward::StoreItem { .. }) {
                // the store item is the reward, there is no coin payout
                request.reward_coins = 0;
            }
            request.habit_data = Some(habit_data(habit, &request.title, &request.description));
        }
    }

    Ok(request)
}

pub(crate) fn mixed_not_supported() -> WizardError {
    WizardError::validation(
        "goal_type",
        "Mixed goals cannot be configured here; create several simple goals instead",
    )
}

fn executor_descriptor(executor: &ExecutorSelection) -> ExecutorDescriptor {
    let user_ids = match executor.kind {
        ExecutorKind::Individual => vec![executor.id.clone()],
        ExecutorKind::MultipleChildren => {
            let member_ids: Vec<String> = executor
                .snapshot
                .members
                .iter()
                .filter_map(|m| m.id.clone())
                .collect();
            if member_ids.is_empty() {
                vec![executor.id.clone()]
            } else {
                member_ids
            }
        }
    };

    ExecutorDescriptor {
        executor_type: executor.kind,
        user_ids,
    }
}

fn condition_for(config: &TypeConfig) -> GoalConditionRequest {
    match config {
        TypeConfig::CoinSaving { target } => GoalConditionRequest {
            condition_type: ConditionType::CoinAmount,
            target_value: *target,
            description: format!("Save {} coins", target),
            weight: 1.0,
            is_streak_required: None,
        },
        TypeConfig::StoreItem(item) => GoalConditionRequest {
            condition_type: ConditionType::CoinAmount,
            target_value: item.cost,
            description: format!("Save {} coins for {}", item.cost, item.title),
            weight: 1.0,
            is_streak_required: None,
        },
        TypeConfig::HabitBuilding(habit) => GoalConditionRequest {
            condition_type: ConditionType::HabitActions,
            target_value: habit.actions_count,
            description: format!(
                "Complete {} actions in {} {}{}",
                habit.actions_count,
                habit.period_value,
                habit.period_type.as_str(),
                if habit.period_value == 1 { "" } else { "s" }
            ),
            weight: 1.0,
            is_streak_required: Some(habit.is_streak_required),
        },
    }
}

fn store_item_data(item: &StoreItemSelection) -> StoreItemData {
    StoreItemData {
        store_item_id: item.item_id.clone(),
        store_item_name: item.title.clone(),
        store_item_cost: item.cost,
        store_item_image_url: item.image_url.clone(),
        availability_deadline: item.availability_end_date.clone(),
    }
}

fn habit_data(habit: &HabitConfiguration, title: &str, description: &str) -> HabitData {
    let (reward_value, reward_reference_id) = match &habit.reward {
        HabitReward::Coins(coins) => (Some(*coins), None),
        HabitReward::StoreItem { item_id, .. } => (None, Some(item_id.clone())),
    };

    HabitData {
        habit_name: title.to_string(),
        habit_description: description.to_string(),
        actions_count: habit.actions_count,
        period_value: habit.period_value,
        period_type: habit.period_type,
        reward_type: habit.reward.reward_type(),
        reward_value,
        reward_reference_id,
        is_streak_required: habit.is_streak_required,
    }
}
