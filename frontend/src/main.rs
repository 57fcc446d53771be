use yew::prelude::*;
use web_sys::MouseEvent;
use shared::GoalCreationResponse;

mod components;
mod hooks;
mod services;

use components::goal_wizard_modal::GoalWizardModal;
use services::api::ApiClient;
use services::logging::Logger;
use services::{app_config, session_store};

#[function_component(App)]
fn app() -> Html {
    let api_client = use_memo((), |_| ApiClient::new(app_config::load(), session_store::load()));
    let wizard_open = use_state(|| false);
    let notice = use_state(|| Option::<String>::None);

    // Only signed-in users get here; everyone else goes back to the login page
    use_effect_with((), {
        let authenticated = api_client.session().is_authenticated();
        move |_| {
            if !authenticated {
                session_store::redirect_to_login();
            }
        }
    });

    let on_new_goal = {
        let wizard_open = wizard_open.clone();
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            notice.set(None);
            wizard_open.set(true);
        })
    };

    let on_close = {
        let wizard_open = wizard_open.clone();
        Callback::from(move |_: ()| wizard_open.set(false))
    };

    let on_created = {
        let notice = notice.clone();
        Callback::from(move |response: GoalCreationResponse| {
            log::info!("Goal created: {:?}", response.id);
            let message = response.message.unwrap_or_else(|| "Goal created!".to_string());
            notice.set(Some(message));
        })
    };

    let session = api_client.session();
    let greeting = session
        .current_user
        .as_ref()
        .map(|user| format!("Hello, {}!", user.name))
        .unwrap_or_default();

    html! {
        <div class="app">
            <header class="app-header">
                <h1>{"FamilyCoins"}</h1>
                <span class="app-user">{greeting}</span>
            </header>

            <main class="app-main">
                {if let Some(message) = (*notice).clone() {
                    html! { <div class="toast toast-success">{message}</div> }
                } else {
                    html! {}
                }}

                {if session.is_parent() {
                    html! {
                        <button class="wizard-button wizard-button-primary" onclick={on_new_goal}>
                            {"Create goal"}
                        </button>
                    }
                } else {
                    html! {}
                }}
            </main>

            <GoalWizardModal
                is_open={*wizard_open}
                api_client={(*api_client).clone()}
                {on_close}
                {on_created}
            />
        </div>
    }
}

fn main() {
    let config = app_config::load();
    if let Err(e) = Logger::init(config.log_endpoint.clone()) {
        gloo::console::error!("Failed to install logger:", e.to_string());
    }
    yew::Renderer::<App>::new().render();
}
