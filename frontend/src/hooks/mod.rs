pub mod use_goal_wizard;
