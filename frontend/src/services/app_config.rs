use goal_wizard::WizardConfig;
use shared::AppConfig;
use wasm_bindgen::JsValue;

/// `window.APP_CONFIG` injected by `/config.js`, as JSON text
fn injected_json() -> Option<String> {
    let window = web_sys::window()?;
    let injected = js_sys::Reflect::get(&window, &JsValue::from_str("APP_CONFIG")).ok()?;
    if injected.is_undefined() || injected.is_null() {
        return None;
    }
    js_sys::JSON::stringify(&injected).ok()?.as_string()
}

/// Read the API location, falling back to defaults.
///
/// Runs before the logger is installed, so problems go straight to the console.
pub fn load() -> AppConfig {
    let Some(json) = injected_json() else {
        return AppConfig::default();
    };

    match AppConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            gloo::console::warn!("Ignoring malformed APP_CONFIG:", e.to_string());
            AppConfig::default()
        }
    }
}

/// Wizard tunables from the same object, e.g. `DEFAULT_REWARD_COINS`
pub fn load_wizard() -> WizardConfig {
    let Some(json) = injected_json() else {
        return WizardConfig::default();
    };

    match serde_json::from_str(&json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring malformed wizard settings in APP_CONFIG: {}", e);
            WizardConfig::default()
        }
    }
}
