pub mod goal_wizard_modal;
