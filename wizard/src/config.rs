use serde::{Deserialize, Serialize};

/// Tunables of the goal wizard.
///
/// Read from the page's injected `APP_CONFIG` object; other keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Reward for reaching a goal when the user leaves the field empty
    #[serde(alias = "DEFAULT_REWARD_COINS")]
    pub default_reward_coins: u32,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            default_reward_coins: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::GoalWizard;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: WizardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, WizardConfig::default());

        let config: WizardConfig = serde_json::from_str(r#"{"default_reward_coins": 10}"#).unwrap();
        assert_eq!(config.default_reward_coins, 10);
    }

    #[test]
    fn test_reads_from_injected_app_config() {
        let injected = r#"{"API_BASE_URL": "https://coins.example", "DEFAULT_REWARD_COINS": 25}"#;
        let config: WizardConfig = serde_json::from_str(injected).unwrap();
        assert_eq!(config.default_reward_coins, 25);

        let wizard = GoalWizard::new(config);
        assert_eq!(wizard.state().reward_coins, 25);
    }
}
