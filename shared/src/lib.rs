use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;

/// Role of a family member as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Parent,
    Child,
}

/// Currently signed-in user, cached by the frontend after login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub family_id: Option<String>,
}

/// Family descriptor, cached alongside the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub name: String,
}

/// Executor kind as it appears in the executor catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorType {
    Individual,
    #[serde(alias = "multiple_children")]
    Group,
}

/// Member of a group executor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorMember {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// A user or group of users a goal can be created for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorOption {
    #[serde(rename = "type")]
    pub executor_type: ExecutorType,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Avatar letter for individuals (older backends send `avatar_letter`)
    #[serde(default, alias = "avatar_letter")]
    pub avatar: Option<String>,
    /// Icon class for groups
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub members: Vec<ExecutorMember>,
}

/// Response of `GET /goals/form-data/executors`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorsResponse {
    #[serde(default)]
    pub executors: Vec<ExecutorOption>,
}

/// Goal type, which determines the conditions a goal is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    CoinSaving,
    StoreItem,
    HabitBuilding,
    Mixed,
}

impl GoalType {
    pub const ALL: [GoalType; 4] = [
        GoalType::CoinSaving,
        GoalType::StoreItem,
        GoalType::HabitBuilding,
        GoalType::Mixed,
    ];

    /// Wire name of the goal type
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::CoinSaving => "coin_saving",
            GoalType::StoreItem => "store_item",
            GoalType::HabitBuilding => "habit_building",
            GoalType::Mixed => "mixed",
        }
    }

    /// Human-readable name shown on goal cards
    pub fn display_name(&self) -> &'static str {
        match self {
            GoalType::CoinSaving => "Coin saving",
            GoalType::StoreItem => "Store item",
            GoalType::HabitBuilding => "Habit building",
            GoalType::Mixed => "Mixed goal",
        }
    }

    /// Font Awesome icon used for this goal type
    pub fn icon(&self) -> &'static str {
        match self {
            GoalType::CoinSaving => "fa-coins",
            GoalType::StoreItem => "fa-shopping-cart",
            GoalType::HabitBuilding => "fa-calendar-check",
            GoalType::Mixed => "fa-layer-group",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| ParseEnumError::new("goal type", s))
    }
}

/// Entry of the goal type catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTypeOption {
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Response of `GET /goals/form-data/goal-types`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTypesResponse {
    #[serde(default)]
    pub goal_types: Vec<GoalTypeOption>,
}

/// Item of the family store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: String,
    pub title: String,
    /// Price in coins
    pub cost: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    /// ISO 8601 date after which the item is no longer offered
    #[serde(default)]
    pub availability_end_date: Option<String>,
}

/// Response of `GET /store`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItemsResponse {
    #[serde(default)]
    pub items: Vec<StoreItem>,
}

/// Executor kind as sent in a goal creation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    Individual,
    MultipleChildren,
}

impl From<ExecutorType> for ExecutorKind {
    fn from(value: ExecutorType) -> Self {
        match value {
            ExecutorType::Individual => ExecutorKind::Individual,
            ExecutorType::Group => ExecutorKind::MultipleChildren,
        }
    }
}

/// Who the goal is created for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorDescriptor {
    pub executor_type: ExecutorKind,
    pub user_ids: Vec<String>,
}

/// Kind of measurable requirement attached to a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    CoinAmount,
    HabitActions,
}

/// A single condition of a goal creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConditionRequest {
    pub condition_type: ConditionType,
    pub target_value: u32,
    pub description: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_streak_required: Option<bool>,
}

/// Length unit of a habit period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Day,
    Week,
    Month,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Day => "day",
            PeriodType::Week => "week",
            PeriodType::Month => "month",
        }
    }
}

impl FromStr for PeriodType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "day" => Ok(PeriodType::Day),
            "week" => Ok(PeriodType::Week),
            "month" => Ok(PeriodType::Month),
            other => Err(ParseEnumError::new("period type", other)),
        }
    }
}

/// How a habit goal is rewarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    Coins,
    StoreItem,
}

impl FromStr for RewardType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "coins" => Ok(RewardType::Coins),
            "store_item" => Ok(RewardType::StoreItem),
            other => Err(ParseEnumError::new("reward type", other)),
        }
    }
}

/// Habit-specific part of a goal creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitData {
    pub habit_name: String,
    pub habit_description: String,
    pub actions_count: u32,
    pub period_value: u32,
    pub period_type: PeriodType,
    pub reward_type: RewardType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_reference_id: Option<String>,
    pub is_streak_required: bool,
}

/// Store-item-specific part of a goal creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItemData {
    pub store_item_id: String,
    pub store_item_name: String,
    pub store_item_cost: u32,
    #[serde(default)]
    pub store_item_image_url: Option<String>,
    #[serde(default)]
    pub availability_deadline: Option<String>,
}

/// Body of `POST /goals/enhanced`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalCreationRequest {
    pub title: String,
    pub description: String,
    pub goal_type: GoalType,
    pub executor: ExecutorDescriptor,
    pub conditions: Vec<GoalConditionRequest>,
    /// Serialized as YYYY-MM-DD
    pub deadline: Option<NaiveDate>,
    pub reward_coins: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habit_data: Option<HabitData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_item_data: Option<StoreItemData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_store_item_id: Option<String>,
}

/// Response after creating a goal
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalCreationResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Either a plain message or a list of validation entries with `msg` fields
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Human-readable message carried by the error body, if any
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Array(entries) => {
                let messages: Vec<String> = entries
                    .iter()
                    .filter_map(|entry| entry.get("msg").and_then(|m| m.as_str()))
                    .map(str::to_string)
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }
}

/// Runtime configuration of the frontend, injected by the page as `window.APP_CONFIG`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(rename = "API_BASE_URL", alias = "api_base_url")]
    pub api_base_url: String,
    #[serde(rename = "API_VERSION", alias = "api_version")]
    pub api_version: String,
    /// Where the frontend posts its log lines (dev server only)
    #[serde(
        rename = "LOG_ENDPOINT",
        alias = "log_endpoint",
        skip_serializing_if = "Option::is_none"
    )]
    pub log_endpoint: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            api_version: "/v1".to_string(),
            log_endpoint: None,
        }
    }
}

impl AppConfig {
    /// Parse the injected configuration object; missing keys fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Full URL of an API endpoint, e.g. `endpoint("/store")`
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        let version = self.api_version.trim_matches('/');
        let path = path.trim_start_matches('/');
        if version.is_empty() {
            format!("{}/{}", base, path)
        } else {
            format!("{}/{}/{}", base, version, path)
        }
    }
}

/// Failure to parse one of the wire enums from user input
#[derive(Debug, Clone, PartialEq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_executor_catalog_parsing() {
        let raw = json!({
            "executors": [
                {
                    "type": "individual",
                    "id": "u1",
                    "name": "Masha",
                    "description": "Daughter",
                    "role": "child",
                    "avatar_letter": "M"
                },
                {
                    "type": "group",
                    "id": "all_children",
                    "name": "All children",
                    "description": "Every child in the family",
                    "icon": "fas fa-users",
                    "members": [{"id": "u1", "name": "Masha", "role": "child"}, {"name": "Petya"}]
                }
            ]
        });

        let response: ExecutorsResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.executors.len(), 2);
        assert_eq!(response.executors[0].executor_type, ExecutorType::Individual);
        assert_eq!(response.executors[0].avatar.as_deref(), Some("M"));
        assert_eq!(response.executors[1].members.len(), 2);
        assert_eq!(response.executors[1].members[1].id, None);
    }

    #[test]
    fn test_goal_type_names() {
        let option: GoalTypeOption = serde_json::from_value(json!({
            "type": "habit_building",
            "name": "Habit",
            "description": "Repeat an action",
            "icon": "fas fa-calendar-check"
        }))
        .unwrap();
        assert_eq!(option.goal_type, GoalType::HabitBuilding);

        assert_eq!("coin_saving".parse::<GoalType>().unwrap(), GoalType::CoinSaving);
        assert!("savings".parse::<GoalType>().is_err());
        assert_eq!(GoalType::StoreItem.to_string(), "store_item");
    }

    #[test]
    fn test_goal_creation_request_wire_shape() {
        let request = GoalCreationRequest {
            title: "Save 500 coins".to_string(),
            description: String::new(),
            goal_type: GoalType::CoinSaving,
            executor: ExecutorDescriptor {
                executor_type: ExecutorKind::Individual,
                user_ids: vec!["u1".to_string()],
            },
            conditions: vec![GoalConditionRequest {
                condition_type: ConditionType::CoinAmount,
                target_value: 500,
                description: "Save 500 coins".to_string(),
                weight: 1.0,
                is_streak_required: None,
            }],
            deadline: NaiveDate::from_ymd_opt(2026, 12, 31),
            reward_coins: 50,
            habit_data: None,
            store_item_data: None,
            target_store_item_id: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["goal_type"], "coin_saving");
        assert_eq!(value["executor"]["executor_type"], "individual");
        assert_eq!(value["conditions"][0]["condition_type"], "coin_amount");
        assert_eq!(value["deadline"], "2026-12-31");
        assert!(value["conditions"][0].get("is_streak_required").is_none());
        assert!(value.get("habit_data").is_none());
        assert!(value.get("target_store_item_id").is_none());
    }

    #[test]
    fn test_group_maps_to_multiple_children() {
        assert_eq!(ExecutorKind::from(ExecutorType::Group), ExecutorKind::MultipleChildren);
        assert_eq!(
            serde_json::to_value(ExecutorKind::MultipleChildren).unwrap(),
            json!("multiple_children")
        );

        let option: ExecutorOption = serde_json::from_value(json!({
            "type": "multiple_children",
            "id": "twins",
            "name": "Twins",
            "description": "Masha and Petya"
        }))
        .unwrap();
        assert_eq!(option.executor_type, ExecutorType::Group);
    }

    #[test]
    fn test_api_error_body_message() {
        let plain: ApiErrorBody =
            serde_json::from_value(json!({"detail": "Not enough coins"})).unwrap();
        assert_eq!(plain.message().as_deref(), Some("Not enough coins"));

        let listed: ApiErrorBody = serde_json::from_value(json!({
            "detail": [{"loc": ["body", "title"], "msg": "field required"}, {"msg": "bad deadline"}]
        }))
        .unwrap();
        assert_eq!(listed.message().as_deref(), Some("field required; bad deadline"));

        let empty: ApiErrorBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.message(), None);
    }

    #[test]
    fn test_app_config_endpoint() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint("/store"), "http://localhost:8000/v1/store");

        let custom = AppConfig::from_json(r#"{"API_BASE_URL": "https://coins.example/"}"#).unwrap();
        assert_eq!(custom.api_version, "/v1");
        assert_eq!(custom.endpoint("goals/enhanced"), "https://coins.example/v1/goals/enhanced");
    }

    #[test]
    fn test_parse_period_and_reward() {
        assert_eq!("week".parse::<PeriodType>().unwrap(), PeriodType::Week);
        assert_eq!("store_item".parse::<RewardType>().unwrap(), RewardType::StoreItem);
        let err = "fortnight".parse::<PeriodType>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown period type: 'fortnight'");
    }
}
