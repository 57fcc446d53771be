//! Session cache kept in the browser's local storage by the login page.

use gloo::storage::{LocalStorage, Storage};
use goal_wizard::Session;
use shared::{Family, User};

const TOKEN_KEY: &str = "authToken";
const USER_KEY: &str = "currentUser";
const FAMILY_KEY: &str = "familyData";

/// Read the cached session. Missing or unreadable entries leave the session unauthenticated.
pub fn load() -> Session {
    let storage = LocalStorage::raw();
    let read = |key: &str| storage.get_item(key).ok().flatten();

    let token = read(TOKEN_KEY).filter(|t| !t.trim().is_empty());
    let current_user = read(USER_KEY).and_then(|json| match serde_json::from_str::<User>(&json) {
        Ok(user) => Some(user),
        Err(e) => {
            gloo::console::warn!("Ignoring unreadable cached user:", e.to_string());
            None
        }
    });
    let family = read(FAMILY_KEY).and_then(|json| serde_json::from_str::<Family>(&json).ok());

    Session {
        token,
        current_user,
        family,
    }
}

/// Forget the cached session after the backend rejected the token
pub fn clear() {
    LocalStorage::delete(TOKEN_KEY);
    LocalStorage::delete(USER_KEY);
    LocalStorage::delete(FAMILY_KEY);
}

/// Send the user back to the login page
pub fn redirect_to_login() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href("login.html") {
            gloo::console::error!("Failed to redirect to login:", e);
        }
    }
}
