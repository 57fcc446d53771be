//! # Step Three Input
//!
//! Raw form values collected on the last wizard step and the typed,
//! goal-type-specific configuration they are parsed into.
//!
//! ## Parsing rules
//! - Counts (coin target, actions, period length, coin reward) must be positive integers
//! - The goal reward may be zero, and falls back to the configured default when empty
//! - Deadlines use the `YYYY-MM-DD` format of a date input
//! - Blank strings are treated the same as missing fields

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use shared::{PeriodType, RewardType, StoreItem};

use crate::error::WizardError;

/// Field values of the configuration step, as entered by the user.
///
/// Numeric fields accept either JSON numbers or strings so the struct can be
/// deserialized straight from form data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepThreeInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reward_coins: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub coin_target: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub actions: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub period_value: Option<String>,
    pub period_type: Option<String>,
    pub reward_type: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reward_value: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reward_item_id: Option<String>,
    pub streak_required: bool,
}

impl StepThreeInput {
    pub fn coin_saving(coin_target: impl ToString) -> Self {
        Self {
            coin_target: Some(coin_target.to_string()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    pub fn with_reward_coins(mut self, reward: impl ToString) -> Self {
        self.reward_coins = Some(reward.to_string());
        self
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    }))
}

/// Store item picked from the catalog for a store-item goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItemSelection {
    pub item_id: String,
    pub title: String,
    pub cost: u32,
    pub image_url: Option<String>,
    pub availability_end_date: Option<String>,
}

impl From<&StoreItem> for StoreItemSelection {
    fn from(item: &StoreItem) -> Self {
        Self {
            item_id: item.id.clone(),
            title: item.title.clone(),
            cost: item.cost,
            image_url: item.image_url.clone(),
            availability_end_date: item.availability_end_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HabitReward {
    Coins(u32),
    StoreItem { item_id: String, item_title: String },
}

impl HabitReward {
    pub fn reward_type(&self) -> RewardType {
        match self {
            HabitReward::Coins(_) => RewardType::Coins,
            HabitReward::StoreItem { .. } => RewardType::StoreItem,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitConfiguration {
    pub actions_count: u32,
    pub period_value: u32,
    pub period_type: PeriodType,
    pub reward: HabitReward,
    pub is_streak_required: bool,
}

/// Goal-type-specific configuration. Only one can exist at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeConfig {
    CoinSaving { target: u32 },
    StoreItem(StoreItemSelection),
    HabitBuilding(HabitConfiguration),
}

/// Trimmed, non-empty value of an optional text field
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a required positive integer
pub(crate) fn positive(field: &str, value: &Option<String>) -> Result<u32, WizardError> {
    let raw = non_blank(value)
        .ok_or_else(|| WizardError::validation(field, format!("{} is required", label(field))))?;
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(WizardError::validation(
            field,
            format!("{} must be a positive whole number", label(field)),
        )),
    }
}

/// Parse an optional non-negative integer
pub(crate) fn non_negative(
    field: &str,
    value: &Option<String>,
) -> Result<Option<u32>, WizardError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => raw.parse::<u32>().map(Some).map_err(|_| {
            WizardError::validation(
                field,
                format!("{} must be a whole number of coins", label(field)),
            )
        }),
    }
}

pub(crate) fn deadline(value: &Option<String>) -> Result<Option<NaiveDate>, WizardError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                WizardError::validation("deadline", "Deadline must be a date like 2025-12-31")
            }),
    }
}

fn label(field: &str) -> &str {
    match field {
        "coin_target" => "Coin target",
        "actions" => "Number of actions",
        "period_value" => "Period length",
        "reward_value" => "Reward",
        "reward_coins" => "Reward",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let input: StepThreeInput = serde_json::from_value(json!({
            "actions": 10,
            "period_value": "30",
            "period_type": "day",
            "reward_type": "coins",
            "reward_value": 100,
            "streak_required": true
        }))
        .unwrap();

        assert_eq!(input.actions.as_deref(), Some("10"));
        assert_eq!(input.period_value.as_deref(), Some("30"));
        assert_eq!(input.reward_value.as_deref(), Some("100"));
        assert!(input.streak_required);
        assert_eq!(input.coin_target, None);
    }

    #[test]
    fn test_positive_rejects_zero_negative_and_text() {
        assert_eq!(positive("coin_target", &Some(" 500 ".into())), Ok(500));

        for bad in ["0", "-5", "12.5", "lots"] {
            let err = positive("coin_target", &Some(bad.to_string())).unwrap_err();
            assert_eq!(err.field(), Some("coin_target"));
        }

        let err = positive("actions", &None).unwrap_err();
        assert_eq!(err.to_string(), "Number of actions is required");
    }

    #[test]
    fn test_non_negative_allows_zero_and_empty() {
        assert_eq!(non_negative("reward_coins", &Some("0".into())), Ok(Some(0)));
        assert_eq!(non_negative("reward_coins", &Some("  ".into())), Ok(None));
        assert!(non_negative("reward_coins", &Some("-1".into())).is_err());
    }

    #[test]
    fn test_deadline_format() {
        assert_eq!(deadline(&Some("2025-12-31".into())), Ok(NaiveDate::from_ymd_opt(2025, 12, 31)));
        assert_eq!(deadline(&None), Ok(None));
        assert_eq!(deadline(&Some("31.12.2025".into())).unwrap_err().field(), Some("deadline"));
    }
}
