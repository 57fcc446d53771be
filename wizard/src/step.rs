use serde::{Deserialize, Serialize};
use std::fmt;

/// The three user-facing steps of goal creation, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    SelectExecutor,
    SelectGoalType,
    ConfigureAndSubmit,
}

impl WizardStep {
    pub const COUNT: u8 = 3;

    /// 1-based step number shown in the step indicator
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::SelectExecutor => 1,
            WizardStep::SelectGoalType => 2,
            WizardStep::ConfigureAndSubmit => 3,
        }
    }

    pub fn prev(&self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectExecutor => None,
            WizardStep::SelectGoalType => Some(WizardStep::SelectExecutor),
            WizardStep::ConfigureAndSubmit => Some(WizardStep::SelectGoalType),
        }
    }

    /// Width of the progress bar in percent
    pub fn progress_percent(&self) -> u8 {
        // 1/3 and 2/3 round down to 33 and 66
        (u16::from(self.number()) * 100 / u16::from(Self::COUNT)) as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::SelectExecutor => "Who is the goal for?",
            WizardStep::SelectGoalType => "Choose a goal type",
            WizardStep::ConfigureAndSubmit => "Configure the goal",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(WizardStep::SelectExecutor.prev(), None);
        assert_eq!(WizardStep::ConfigureAndSubmit.prev(), Some(WizardStep::SelectGoalType));
        assert!(WizardStep::SelectExecutor < WizardStep::ConfigureAndSubmit);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(WizardStep::SelectExecutor.progress_percent(), 33);
        assert_eq!(WizardStep::SelectGoalType.progress_percent(), 66);
        assert_eq!(WizardStep::ConfigureAndSubmit.progress_percent(), 100);
    }
}
